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

//! State shared by every object of one headless factory.

use super::config::HeadlessConfig;
use super::fault::{Call, FaultPlan};
use super::tracker::{ObjectId, ObjectKind, ObjectTracker};
use lumen_core::renderer::{ApiError, ResourceState};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

/// Identifies the memory behind a resource, independently of how many
/// references to it are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(pub u64);

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource #{}", self.0)
    }
}

/// One transition executed on the simulated GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierRecord {
    pub resource: ResourceKey,
    pub before: ResourceState,
    pub after: ResourceState,
}

/// Counters of the work the simulated GPU executed.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    pub presents: u64,
    pub draws: u64,
    pub clears: u64,
    pub executed_lists: u64,
    pub event_waits: u64,
    /// Every root constant value set by an executed list, in order.
    pub root_constants: Vec<u32>,
    pub barriers: Vec<BarrierRecord>,
}

#[derive(Debug, Clone, Copy)]
struct PendingSignal {
    fence: ObjectId,
    value: u64,
    serial: u64,
}

#[derive(Debug, Clone, Copy)]
struct ArmedEvent {
    fence: ObjectId,
    value: u64,
    event: ObjectId,
}

/// The simulated GPU: submissions retire in order, fence signals queue behind
/// them and events fire once their fence reaches the armed value.
#[derive(Debug, Default)]
pub struct GpuTimeline {
    submitted: u64,
    completed: u64,
    pending: VecDeque<PendingSignal>,
    fence_values: HashMap<ObjectId, u64>,
    armed: Vec<ArmedEvent>,
    signaled: HashSet<ObjectId>,
}

impl GpuTimeline {
    /// Queues one submission and returns its serial.
    pub fn submit(&mut self) -> u64 {
        self.submitted += 1;
        self.submitted
    }

    /// Serial of the last submission the GPU finished.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn register_fence(&mut self, fence: ObjectId, initial: u64) {
        self.fence_values.insert(fence, initial);
    }

    pub fn fence_value(&self, fence: ObjectId) -> u64 {
        self.fence_values.get(&fence).copied().unwrap_or(0)
    }

    /// Queues a signal behind every submission made so far.
    pub fn signal(&mut self, fence: ObjectId, value: u64) {
        self.pending.push_back(PendingSignal {
            fence,
            value,
            serial: self.submitted,
        });
    }

    pub fn arm(&mut self, fence: ObjectId, value: u64, event: ObjectId) {
        self.armed.push(ArmedEvent {
            fence,
            value,
            event,
        });
        self.fire_events();
    }

    /// Completes all queued work.
    pub fn retire_all(&mut self) {
        self.completed = self.submitted;
        while let Some(signal) = self.pending.pop_front() {
            let current = self.fence_values.entry(signal.fence).or_default();
            *current = (*current).max(signal.value);
            self.completed = self.completed.max(signal.serial);
        }
        self.fire_events();
    }

    /// Blocks on `event`. The GPU is drained first, so a wait only fails when the
    /// event can never fire. Events reset automatically.
    pub fn wait(&mut self, event: ObjectId) -> Result<(), ApiError> {
        if !self.signaled.contains(&event) {
            self.retire_all();
        }
        if self.signaled.remove(&event) {
            Ok(())
        } else {
            Err(ApiError::WaitFailed(format!(
                "event #{} is not armed on any reachable fence value",
                event.0
            )))
        }
    }

    fn fire_events(&mut self) {
        let fence_values = &self.fence_values;
        let signaled = &mut self.signaled;
        self.armed.retain(|armed| {
            let reached = fence_values.get(&armed.fence).copied().unwrap_or(0) >= armed.value;
            if reached {
                signaled.insert(armed.event);
            }
            !reached
        });
    }
}

/// Mutable state of one headless factory and everything created from it.
#[derive(Debug, Default)]
pub struct SharedState {
    pub tracker: ObjectTracker,
    pub timeline: GpuTimeline,
    pub resource_states: HashMap<ResourceKey, ResourceState>,
    /// Render-target view address to the resource it views.
    pub rtv_bindings: HashMap<usize, ResourceKey>,
    /// Base address, descriptor count and increment of every RTV heap.
    pub rtv_heaps: Vec<(usize, u32, u32)>,
    pub validation: Vec<String>,
    pub log: FrameLog,
    faults: FaultPlan,
    calls: HashMap<Call, u32>,
    next_key: u64,
}

impl SharedState {
    /// Counts one invocation of `call` and applies the fault plan.
    pub fn enter(&mut self, call: Call) -> Result<(), ApiError> {
        let count = self.calls.entry(call).or_default();
        *count += 1;
        self.faults.check(call, *count)
    }

    pub fn call_count(&self, call: Call) -> u32 {
        self.calls.get(&call).copied().unwrap_or(0)
    }

    /// Allocates the backing memory identity of a new resource.
    pub fn new_resource(&mut self, initial_state: ResourceState) -> ResourceKey {
        self.next_key += 1;
        let key = ResourceKey(self.next_key);
        self.resource_states.insert(key, initial_state);
        key
    }

    pub fn validation_error(&mut self, message: String) {
        log::warn!("Headless validation: {message}");
        self.validation.push(message);
    }

    /// Finds the RTV heap slot `ptr` addresses, if any.
    pub fn rtv_slot(&self, ptr: usize) -> Option<u32> {
        self.rtv_heaps.iter().find_map(|&(base, count, increment)| {
            let offset = ptr.checked_sub(base)?;
            let increment = increment as usize;
            let index = offset / increment;
            (offset % increment == 0 && index < count as usize).then_some(index as u32)
        })
    }
}

/// The configuration and state behind every headless object.
#[derive(Debug)]
pub struct Shared {
    pub config: HeadlessConfig,
    pub state: RefCell<SharedState>,
}

impl Shared {
    pub fn new(config: HeadlessConfig, faults: FaultPlan) -> Rc<Self> {
        Rc::new(Self {
            config,
            state: RefCell::new(SharedState {
                faults,
                ..SharedState::default()
            }),
        })
    }

    pub fn enter(&self, call: Call) -> Result<(), ApiError> {
        self.state.borrow_mut().enter(call)
    }

    pub fn validation_error(&self, message: String) {
        self.state.borrow_mut().validation_error(message);
    }

    pub fn track(self: &Rc<Self>, kind: ObjectKind) -> TrackedObject {
        let id = self.state.borrow_mut().tracker.create(kind);
        TrackedObject {
            shared: Rc::clone(self),
            id,
        }
    }
}

/// Ownership of one tracked object. Dropping it records the release.
#[derive(Debug)]
pub struct TrackedObject {
    shared: Rc<Shared>,
    id: ObjectId,
}

impl TrackedObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }
}

impl Drop for TrackedObject {
    fn drop(&mut self) {
        match self.shared.state.try_borrow_mut() {
            Ok(mut state) => state.tracker.release(self.id),
            Err(_) => log::error!(
                "Headless state busy while releasing object #{}; release not recorded",
                self.id.0
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_complete_after_the_gpu_drains() {
        let mut timeline = GpuTimeline::default();
        let fence = ObjectId(1);
        let event = ObjectId(2);
        timeline.register_fence(fence, 0);

        timeline.submit();
        timeline.signal(fence, 1);
        assert_eq!(timeline.fence_value(fence), 0);

        timeline.arm(fence, 1, event);
        assert_eq!(timeline.wait(event), Ok(()));
        assert_eq!(timeline.fence_value(fence), 1);
        assert_eq!(timeline.completed(), 1);
    }

    #[test]
    fn waiting_on_an_unreachable_value_fails() {
        let mut timeline = GpuTimeline::default();
        let fence = ObjectId(1);
        let event = ObjectId(2);
        timeline.register_fence(fence, 0);
        timeline.signal(fence, 1);

        timeline.arm(fence, 5, event);
        assert!(matches!(timeline.wait(event), Err(ApiError::WaitFailed(_))));
    }

    #[test]
    fn events_reset_after_a_wait() {
        let mut timeline = GpuTimeline::default();
        let fence = ObjectId(1);
        let event = ObjectId(2);
        timeline.register_fence(fence, 3);

        timeline.arm(fence, 2, event);
        assert_eq!(timeline.wait(event), Ok(()));
        assert!(timeline.wait(event).is_err());
    }

    #[test]
    fn rtv_slots_must_be_aligned_and_in_range() {
        let mut state = SharedState::default();
        state.rtv_heaps.push((0x1000, 3, 32));
        assert_eq!(state.rtv_slot(0x1000), Some(0));
        assert_eq!(state.rtv_slot(0x1040), Some(2));
        assert_eq!(state.rtv_slot(0x1060), None);
        assert_eq!(state.rtv_slot(0x1010), None);
        assert_eq!(state.rtv_slot(0x0800), None);
    }
}
