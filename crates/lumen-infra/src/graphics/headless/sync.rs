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

use super::fault::Call;
use super::state::TrackedObject;
use super::Headless;
use lumen_core::renderer::{ApiError, Event, Fence};

/// A simulated fence. Its value only moves when the simulated GPU retires a
/// queued signal.
#[derive(Debug)]
pub struct HeadlessFence {
    pub(crate) tracked: TrackedObject,
}

impl Fence<Headless> for HeadlessFence {
    fn completed_value(&self) -> u64 {
        let state = self.tracked.shared().state.borrow();
        state.timeline.fence_value(self.tracked.id())
    }

    fn set_event_on_completion(&self, value: u64, event: &HeadlessEvent) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::SetEventOnCompletion)?;
        state
            .timeline
            .arm(self.tracked.id(), value, event.tracked.id());
        Ok(())
    }
}

/// A simulated auto-reset event.
#[derive(Debug)]
pub struct HeadlessEvent {
    pub(crate) tracked: TrackedObject,
}

impl Event for HeadlessEvent {
    fn wait(&self) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::WaitForEvent)?;
        state.log.event_waits += 1;
        state.timeline.wait(self.tracked.id())
    }
}
