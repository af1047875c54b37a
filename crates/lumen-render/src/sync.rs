// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The frame fence: one monotonic counter and one waitable event.
//!
//! Every wait stalls the CPU until the GPU has retired all submitted work. The same
//! fence paces the steady-state frames and the one-time wait after the vertex
//! upload, so there is never more than one frame in flight.

use lumen_core::renderer::{Api, CommandQueue, Device, Event, Fence, RenderError};

/// A fence, its completion event and the last value signaled into the queue.
pub struct FrameFence<A: Api> {
    // Released before the fence.
    event: A::Event,
    fence: A::Fence,
    value: u64,
    // Work was executed on the queue and no wait has covered it yet.
    unwaited_submission: bool,
}

impl<A: Api> FrameFence<A> {
    /// Creates the fence at value 0 and its event.
    pub fn new(device: &A::Device) -> Result<Self, RenderError> {
        let fence = device
            .create_fence(0)
            .map_err(RenderError::FenceCreationFailed)?;
        let event = device
            .create_event()
            .map_err(RenderError::FenceCreationFailed)?;
        Ok(Self {
            event,
            fence,
            value: 0,
            unwaited_submission: false,
        })
    }

    /// Signals the next counter value into `queue` and blocks until the GPU reaches
    /// it. Returns the value waited for.
    ///
    /// The wait has no timeout.
    pub fn signal_and_wait(&mut self, queue: &A::CommandQueue) -> Result<u64, RenderError> {
        let target = self.value + 1;
        queue
            .signal(&self.fence, target)
            .map_err(RenderError::SynchronizationFailed)?;
        self.value = target;

        if self.fence.completed_value() < target {
            self.fence
                .set_event_on_completion(target, &self.event)
                .map_err(RenderError::SynchronizationFailed)?;
            self.event
                .wait()
                .map_err(RenderError::SynchronizationFailed)?;
        }
        self.unwaited_submission = false;
        log::trace!("Fence reached {}", target);
        Ok(target)
    }

    /// The last value the GPU completed.
    pub fn completed_value(&self) -> u64 {
        self.fence.completed_value()
    }

    /// The last value signaled into the queue.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Records that command lists were executed on the queue. The fence is not
    /// idle again until a successful [`FrameFence::signal_and_wait`].
    pub fn mark_submitted(&mut self) {
        self.unwaited_submission = true;
    }

    /// `true` once the GPU has completed everything signaled so far and every
    /// submission has been waited for.
    pub fn is_idle(&self) -> bool {
        !self.unwaited_submission && self.completed_value() >= self.value
    }
}
