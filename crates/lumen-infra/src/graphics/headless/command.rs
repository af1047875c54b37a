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

//! Simulated queues, allocators and command lists.
//!
//! Lists record commands into a log. The queue replays the log against the
//! simulated resource states when the list is executed, which is where misuse
//! (wrong barrier before-states, draws without bound state, clears of targets
//! still in the present state) surfaces as validation messages.

use super::fault::Call;
use super::resource::{HeadlessPipelineState, HeadlessResource, HeadlessRootSignature};
use super::state::{BarrierRecord, ResourceKey, SharedState, TrackedObject};
use super::sync::HeadlessFence;
use super::Headless;
use lumen_core::renderer::{
    ApiError, CommandAllocator, CommandListState, CommandListType, CommandQueue,
    CpuDescriptorHandle, GraphicsCommandList, PrimitiveTopology, ResourceState, ScissorRect,
    TransitionBarrier, VertexBufferView, Viewport,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A simulated direct command queue.
#[derive(Debug)]
pub struct HeadlessCommandQueue {
    pub(crate) tracked: TrackedObject,
}

impl CommandQueue<Headless> for HeadlessCommandQueue {
    fn execute_command_lists(&self, lists: &[&HeadlessCommandList]) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::ExecuteCommandLists)?;

        for list in lists {
            let record = list.record.borrow();
            if record.kind != CommandListType::Direct {
                return Err(ApiError::InvalidArgument(
                    "bundles cannot be submitted to a queue".to_string(),
                ));
            }
            if record.state != CommandListState::Closed {
                return Err(ApiError::InvalidCall(format!(
                    "command list submitted while {}",
                    record.state
                )));
            }
        }

        let serial = state.timeline.submit();
        for list in lists {
            let mut record = list.record.borrow_mut();
            let mut replay = Replay::default();
            replay.run(&mut state, &record.commands, false);
            record.state = CommandListState::Submitted;
            record.allocator.last_submission.set(serial);
            state.log.executed_lists += 1;
        }
        if shared.config.gpu_completes_immediately {
            state.timeline.retire_all();
        }
        Ok(())
    }

    fn signal(&self, fence: &HeadlessFence, value: u64) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::Signal)?;
        state.timeline.signal(fence.tracked.id(), value);
        if shared.config.gpu_completes_immediately {
            state.timeline.retire_all();
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct AllocatorRecord {
    pub(crate) kind: CommandListType,
    pub(crate) last_submission: Cell<u64>,
}

/// A simulated command allocator. Remembers the last submission that used it.
#[derive(Debug)]
pub struct HeadlessCommandAllocator {
    pub(crate) tracked: TrackedObject,
    pub(crate) record: Rc<AllocatorRecord>,
}

impl CommandAllocator for HeadlessCommandAllocator {
    fn reset(&self) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::ResetCommandAllocator)?;
        let last = self.record.last_submission.get();
        if last > state.timeline.completed() {
            let message = format!(
                "{} allocator reset while submission {last} is still executing",
                self.record.kind
            );
            state.validation_error(message.clone());
            return Err(ApiError::InvalidCall(message));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) enum Command {
    SetViewports(Vec<Viewport>),
    SetScissorRects(Vec<ScissorRect>),
    Barrier(BarrierRecord),
    SetRenderTargets(Vec<CpuDescriptorHandle>),
    ClearRenderTarget(CpuDescriptorHandle),
    SetRootSignature(Rc<[u32]>),
    SetRootConstant { index: u32, value: u32, offset: u32 },
    SetTopology(PrimitiveTopology),
    SetVertexBuffers(Vec<VertexBufferView>),
    Draw { vertex_count: u32, start_vertex: u32 },
    ExecuteBundle(Rc<RefCell<ListRecord>>),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::SetViewports(_) => "RSSetViewports",
            Command::SetScissorRects(_) => "RSSetScissorRects",
            Command::Barrier(_) => "ResourceBarrier",
            Command::SetRenderTargets(_) => "OMSetRenderTargets",
            Command::ClearRenderTarget(_) => "ClearRenderTargetView",
            Command::SetRootSignature(_) => "SetGraphicsRootSignature",
            Command::SetRootConstant { .. } => "SetGraphicsRoot32BitConstant",
            Command::SetTopology(_) => "IASetPrimitiveTopology",
            Command::SetVertexBuffers(_) => "IASetVertexBuffers",
            Command::Draw { .. } => "DrawInstanced",
            Command::ExecuteBundle(_) => "ExecuteBundle",
        }
    }

    fn allowed_in_bundle(&self) -> bool {
        !matches!(
            self,
            Command::SetViewports(_)
                | Command::SetScissorRects(_)
                | Command::Barrier(_)
                | Command::SetRenderTargets(_)
                | Command::ClearRenderTarget(_)
                | Command::ExecuteBundle(_)
        )
    }
}

#[derive(Debug)]
pub(crate) struct ListRecord {
    pub(crate) kind: CommandListType,
    pub(crate) state: CommandListState,
    pub(crate) commands: Vec<Command>,
    pub(crate) allocator: Rc<AllocatorRecord>,
}

/// A simulated direct command list or bundle.
#[derive(Debug)]
pub struct HeadlessCommandList {
    pub(crate) tracked: TrackedObject,
    pub(crate) record: Rc<RefCell<ListRecord>>,
}

impl HeadlessCommandList {
    /// Number of commands recorded since the last reset.
    pub fn recorded_commands(&self) -> usize {
        self.record.borrow().commands.len()
    }

    fn record(&mut self, command: Command) {
        let mut record = self.record.borrow_mut();
        if record.state != CommandListState::Open {
            self.tracked.shared().validation_error(format!(
                "{} recorded into a {} {} list",
                command.name(),
                record.state,
                record.kind
            ));
            return;
        }
        if record.kind == CommandListType::Bundle && !command.allowed_in_bundle() {
            self.tracked
                .shared()
                .validation_error(format!("{} is not allowed in a bundle", command.name()));
            return;
        }
        record.commands.push(command);
    }
}

impl GraphicsCommandList<Headless> for HeadlessCommandList {
    fn kind(&self) -> CommandListType {
        self.record.borrow().kind
    }

    fn reset(
        &mut self,
        allocator: &HeadlessCommandAllocator,
        _initial_state: Option<&HeadlessPipelineState>,
    ) -> Result<(), ApiError> {
        let mut record = self.record.borrow_mut();
        self.tracked
            .shared()
            .enter(Call::ResetCommandList(record.kind))?;
        if record.state == CommandListState::Open {
            return Err(ApiError::InvalidCall(
                "command list reset while still open".to_string(),
            ));
        }
        if allocator.record.kind != record.kind {
            return Err(ApiError::InvalidArgument(format!(
                "{} allocator cannot back a {} list",
                allocator.record.kind, record.kind
            )));
        }
        record.state = CommandListState::Open;
        record.commands.clear();
        record.allocator = Rc::clone(&allocator.record);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ApiError> {
        let mut record = self.record.borrow_mut();
        self.tracked
            .shared()
            .enter(Call::CloseCommandList(record.kind))?;
        if record.state != CommandListState::Open {
            return Err(ApiError::InvalidCall(format!(
                "command list closed while {}",
                record.state
            )));
        }
        record.state = CommandListState::Closed;
        Ok(())
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.record(Command::SetViewports(viewports.to_vec()));
    }

    fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.record(Command::SetScissorRects(rects.to_vec()));
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier<'_, HeadlessResource>]) {
        for barrier in barriers {
            self.record(Command::Barrier(BarrierRecord {
                resource: barrier.resource.key,
                before: barrier.before,
                after: barrier.after,
            }));
        }
    }

    fn set_render_targets(&mut self, render_targets: &[CpuDescriptorHandle]) {
        self.record(Command::SetRenderTargets(render_targets.to_vec()));
    }

    fn clear_render_target_view(&mut self, render_target: CpuDescriptorHandle, _color: [f32; 4]) {
        self.record(Command::ClearRenderTarget(render_target));
    }

    fn set_graphics_root_signature(&mut self, root_signature: &HeadlessRootSignature) {
        self.record(Command::SetRootSignature(Rc::clone(
            &root_signature.parameters,
        )));
    }

    fn set_graphics_root_32bit_constant(
        &mut self,
        root_parameter_index: u32,
        value: u32,
        dest_offset_in_32bit_values: u32,
    ) {
        self.record(Command::SetRootConstant {
            index: root_parameter_index,
            value,
            offset: dest_offset_in_32bit_values,
        });
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(Command::SetTopology(topology));
    }

    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]) {
        if start_slot != 0 {
            self.tracked
                .shared()
                .validation_error(format!("vertex buffers bound at slot {start_slot}"));
        }
        self.record(Command::SetVertexBuffers(views.to_vec()));
    }

    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        _instance_count: u32,
        start_vertex_location: u32,
        _start_instance_location: u32,
    ) {
        self.record(Command::Draw {
            vertex_count: vertex_count_per_instance,
            start_vertex: start_vertex_location,
        });
    }

    fn execute_bundle(&mut self, bundle: &HeadlessCommandList) {
        self.record(Command::ExecuteBundle(Rc::clone(&bundle.record)));
    }
}

/// Pipeline state accumulated while replaying one submitted list.
#[derive(Debug, Default)]
struct Replay {
    viewport: bool,
    scissor: bool,
    render_targets: Vec<ResourceKey>,
    root_parameters: Option<Rc<[u32]>>,
    constants_set: bool,
    topology: Option<PrimitiveTopology>,
    vertex_buffers: Vec<VertexBufferView>,
}

impl Replay {
    fn run(&mut self, state: &mut SharedState, commands: &[Command], in_bundle: bool) {
        for command in commands {
            match command {
                Command::SetViewports(viewports) => self.viewport = !viewports.is_empty(),
                Command::SetScissorRects(rects) => self.scissor = !rects.is_empty(),
                Command::Barrier(barrier) => Self::transition(state, *barrier),
                Command::SetRenderTargets(handles) => {
                    self.render_targets.clear();
                    for handle in handles {
                        match state.rtv_bindings.get(&handle.ptr) {
                            Some(key) => self.render_targets.push(*key),
                            None => state.validation_error(format!(
                                "render target 0x{:x} has no view",
                                handle.ptr
                            )),
                        }
                    }
                }
                Command::ClearRenderTarget(handle) => {
                    state.log.clears += 1;
                    match state.rtv_bindings.get(&handle.ptr).copied() {
                        Some(key) => Self::expect_render_target(state, key, "cleared"),
                        None => state.validation_error(format!(
                            "clear of render target 0x{:x} that has no view",
                            handle.ptr
                        )),
                    }
                }
                Command::SetRootSignature(parameters) => {
                    self.root_parameters = Some(Rc::clone(parameters));
                    self.constants_set = false;
                }
                Command::SetRootConstant {
                    index,
                    value,
                    offset,
                } => {
                    let in_range = self
                        .root_parameters
                        .as_ref()
                        .and_then(|params| params.get(*index as usize))
                        .is_some_and(|count| offset < count);
                    if in_range {
                        self.constants_set = true;
                        state.log.root_constants.push(*value);
                    } else {
                        state.validation_error(format!(
                            "root constant {index}[{offset}] set without a matching root signature"
                        ));
                    }
                }
                Command::SetTopology(topology) => self.topology = Some(*topology),
                Command::SetVertexBuffers(views) => self.vertex_buffers = views.clone(),
                Command::Draw {
                    vertex_count,
                    start_vertex,
                } => self.draw(state, *vertex_count, *start_vertex),
                Command::ExecuteBundle(bundle) => {
                    if in_bundle {
                        state.validation_error("nested bundle execution".to_string());
                        continue;
                    }
                    let bundle = bundle.borrow();
                    if bundle.state != CommandListState::Closed {
                        state.validation_error(format!("bundle executed while {}", bundle.state));
                        continue;
                    }
                    self.run(state, &bundle.commands, true);
                }
            }
        }
    }

    fn transition(state: &mut SharedState, barrier: BarrierRecord) {
        let current = state.resource_states.get(&barrier.resource).copied();
        if current != Some(barrier.before) {
            state.validation_error(format!(
                "barrier on {} expects {} but the resource is {}",
                barrier.resource,
                barrier.before,
                current.map_or_else(|| "unknown".to_string(), |s| s.to_string())
            ));
        }
        state
            .resource_states
            .insert(barrier.resource, barrier.after);
        state.log.barriers.push(barrier);
    }

    fn expect_render_target(state: &mut SharedState, key: ResourceKey, action: &str) {
        let current = state.resource_states.get(&key).copied();
        if current != Some(ResourceState::RenderTarget) {
            state.validation_error(format!(
                "{key} {action} while {}",
                current.map_or_else(|| "unknown".to_string(), |s| s.to_string())
            ));
        }
    }

    fn draw(&mut self, state: &mut SharedState, vertex_count: u32, start_vertex: u32) {
        state.log.draws += 1;
        if !self.viewport || !self.scissor {
            state.validation_error("draw without a viewport and scissor".to_string());
        }
        if self.root_parameters.is_none() {
            state.validation_error("draw without a root signature".to_string());
        } else if !self.constants_set {
            state.validation_error("draw with unset root constants".to_string());
        }
        if self.topology.is_none() {
            state.validation_error("draw without a primitive topology".to_string());
        }
        let available = self
            .vertex_buffers
            .first()
            .map_or(0, VertexBufferView::vertex_count);
        if start_vertex.saturating_add(vertex_count) > available {
            state.validation_error(format!(
                "draw of {vertex_count} vertices from {start_vertex} exceeds the {available} bound"
            ));
        }
        if self.render_targets.is_empty() {
            state.validation_error("draw without a render target".to_string());
        }
        for key in self.render_targets.clone() {
            Self::expect_render_target(state, key, "drawn to");
        }
    }
}
