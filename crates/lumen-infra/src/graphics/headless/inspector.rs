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
use super::state::{BarrierRecord, FrameLog, ResourceKey, Shared};
use super::tracker::ObjectKind;
use lumen_core::renderer::ResourceState;
use std::rc::Rc;

/// Read access to the state behind a [`HeadlessFactory`](super::HeadlessFactory).
///
/// The inspector is not a tracked object and may outlive everything it observes,
/// which is how leaks and the release order are checked after teardown.
#[derive(Debug, Clone)]
pub struct HeadlessInspector {
    shared: Rc<Shared>,
}

impl HeadlessInspector {
    pub(crate) fn new(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    /// Kinds of the objects still alive, in creation order.
    pub fn live_objects(&self) -> Vec<ObjectKind> {
        let state = self.shared.state.borrow();
        state.tracker.live().map(|(_, kind)| kind).collect()
    }

    pub fn live_count(&self) -> usize {
        self.shared.state.borrow().tracker.live().count()
    }

    /// Kinds of every object created so far, in creation order.
    pub fn creation_order(&self) -> Vec<ObjectKind> {
        let state = self.shared.state.borrow();
        state.tracker.created().iter().map(|(_, kind)| *kind).collect()
    }

    /// Kinds of every released object, in release order.
    pub fn release_order(&self) -> Vec<ObjectKind> {
        let state = self.shared.state.borrow();
        state.tracker.released().iter().map(|(_, kind)| *kind).collect()
    }

    pub fn double_release_count(&self) -> usize {
        self.shared.state.borrow().tracker.double_releases().len()
    }

    /// Misuse detected while recording or executing commands.
    pub fn validation_messages(&self) -> Vec<String> {
        self.shared.state.borrow().validation.clone()
    }

    /// A snapshot of the executed-work counters.
    pub fn frame_log(&self) -> FrameLog {
        self.shared.state.borrow().log.clone()
    }

    pub fn presents(&self) -> u64 {
        self.shared.state.borrow().log.presents
    }

    pub fn draws(&self) -> u64 {
        self.shared.state.borrow().log.draws
    }

    /// Root constant values in execution order.
    pub fn root_constants(&self) -> Vec<u32> {
        self.shared.state.borrow().log.root_constants.clone()
    }

    pub fn barriers(&self) -> Vec<BarrierRecord> {
        self.shared.state.borrow().log.barriers.clone()
    }

    /// How many times `call` was invoked, failed invocations included.
    pub fn call_count(&self, call: Call) -> u32 {
        self.shared.state.borrow().call_count(call)
    }

    /// The state the simulated GPU last left `resource` in.
    pub fn resource_state(&self, resource: ResourceKey) -> Option<ResourceState> {
        self.shared
            .state
            .borrow()
            .resource_states
            .get(&resource)
            .copied()
    }

    /// Serial of the last submission the simulated GPU completed.
    pub fn completed_submission(&self) -> u64 {
        self.shared.state.borrow().timeline.completed()
    }
}
