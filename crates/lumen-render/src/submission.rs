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

//! Command allocators, the per-frame direct list and the precomputed bundle.

use crate::rotation::RotationAngle;
use lumen_core::renderer::{
    Api, CommandAllocator, CommandListState, CommandListType, CommandQueue, CpuDescriptorHandle,
    Device, GraphicsCommandList, PrimitiveTopology, RenderError, ResourceState, ScissorRect,
    TransitionBarrier, VertexBufferView, Viewport,
};

/// One allocator per kind of command list.
///
/// Only one list of each kind is ever in flight, and the direct allocator is only
/// reset after the frame fence wait, so it never backs a list the GPU still reads.
pub struct CommandAllocators<A: Api> {
    bundle: A::CommandAllocator,
    direct: A::CommandAllocator,
}

impl<A: Api> CommandAllocators<A> {
    /// Creates the direct and bundle allocators.
    pub fn new(device: &A::Device) -> Result<Self, RenderError> {
        let create = |kind| {
            device
                .create_command_allocator(kind)
                .map_err(|source| RenderError::CommandAllocatorCreationFailed { kind, source })
        };
        let direct = create(CommandListType::Direct)?;
        let bundle = create(CommandListType::Bundle)?;
        Ok(Self { bundle, direct })
    }

    /// The allocator of the per-frame list.
    pub fn direct(&self) -> &A::CommandAllocator {
        &self.direct
    }

    /// The allocator of the bundle.
    pub fn bundle(&self) -> &A::CommandAllocator {
        &self.bundle
    }
}

/// Everything a frame's recording refers to.
pub struct FrameTargets<'a, A: Api> {
    /// Pipeline state the list is reset with.
    pub pipeline_state: &'a A::PipelineState,
    /// Root signature the constant is pushed through.
    pub root_signature: &'a A::RootSignature,
    /// The back buffer rendered into.
    pub back_buffer: &'a A::Resource,
    /// Its render-target view.
    pub rtv: CpuDescriptorHandle,
    /// Full-target viewport.
    pub viewport: Viewport,
    /// Full-target scissor rectangle.
    pub scissor: ScissorRect,
    /// Clear color.
    pub clear_color: [f32; 4],
}

/// The direct command list re-recorded every frame and the bundle recorded once.
///
/// Tracks each list through `Open -> Closed -> Submitted` and refuses to record,
/// close or submit out of order.
pub struct CommandEngine<A: Api> {
    bundle: A::CommandList,
    list: A::CommandList,
    bundle_state: CommandListState,
    list_state: CommandListState,
}

impl<A: Api> CommandEngine<A> {
    /// Creates the direct list bound to `pipeline_state` and closes it, then creates
    /// the bundle, left open for [`CommandEngine::record_bundle`].
    pub fn new(
        device: &A::Device,
        allocators: &CommandAllocators<A>,
        pipeline_state: &A::PipelineState,
    ) -> Result<Self, RenderError> {
        let direct = |source| RenderError::CommandListCreationFailed {
            kind: CommandListType::Direct,
            source,
        };
        let mut list = device
            .create_command_list(CommandListType::Direct, &allocators.direct, Some(pipeline_state))
            .map_err(direct)?;
        list.close().map_err(direct)?;

        let bundle = device
            .create_command_list(CommandListType::Bundle, &allocators.bundle, Some(pipeline_state))
            .map_err(|source| RenderError::CommandListCreationFailed {
                kind: CommandListType::Bundle,
                source,
            })?;

        Ok(Self {
            bundle,
            list,
            bundle_state: CommandListState::Open,
            list_state: CommandListState::Closed,
        })
    }

    /// Records the bundle: triangle-strip topology, the quad's vertex buffer and one
    /// draw of all its vertices. The bundle never touches per-frame state.
    pub fn record_bundle(&mut self, vertices: VertexBufferView) -> Result<(), RenderError> {
        expect_state(CommandListState::Open, self.bundle_state)?;
        self.bundle
            .set_primitive_topology(PrimitiveTopology::TriangleStrip);
        self.bundle.set_vertex_buffers(0, &[vertices]);
        self.bundle.draw_instanced(vertices.vertex_count(), 1, 0, 0);
        self.bundle
            .close()
            .map_err(|source| RenderError::CommandListCreationFailed {
                kind: CommandListType::Bundle,
                source,
            })?;
        self.bundle_state = CommandListState::Closed;
        Ok(())
    }

    /// Records one frame into the direct list and closes it. Returns the root
    /// constant pushed, then advances `rotation`.
    pub fn populate(
        &mut self,
        allocators: &CommandAllocators<A>,
        targets: &FrameTargets<'_, A>,
        rotation: &mut RotationAngle,
    ) -> Result<u32, RenderError> {
        expect_state(CommandListState::Closed, self.bundle_state)?;
        if self.list_state == CommandListState::Open {
            return Err(RenderError::InvalidCommandListState {
                expected: CommandListState::Closed,
                found: CommandListState::Open,
            });
        }

        allocators
            .direct
            .reset()
            .map_err(RenderError::RecordingFailed)?;
        self.list
            .reset(&allocators.direct, Some(targets.pipeline_state))
            .map_err(RenderError::RecordingFailed)?;
        self.list_state = CommandListState::Open;

        let list = &mut self.list;
        list.set_viewports(&[targets.viewport]);
        list.set_scissor_rects(&[targets.scissor]);

        list.resource_barrier(&[TransitionBarrier::new(
            targets.back_buffer,
            ResourceState::Present,
            ResourceState::RenderTarget,
        )]);

        list.set_render_targets(&[targets.rtv]);
        list.clear_render_target_view(targets.rtv, targets.clear_color);

        list.set_graphics_root_signature(targets.root_signature);
        let pushed = rotation.bits();
        list.set_graphics_root_32bit_constant(0, pushed, 0);

        list.execute_bundle(&self.bundle);

        rotation.advance();

        list.resource_barrier(&[TransitionBarrier::new(
            targets.back_buffer,
            ResourceState::RenderTarget,
            ResourceState::Present,
        )]);

        list.close().map_err(RenderError::RecordingFailed)?;
        self.list_state = CommandListState::Closed;
        Ok(pushed)
    }

    /// Executes the closed direct list on `queue`.
    pub fn submit(&mut self, queue: &A::CommandQueue) -> Result<(), RenderError> {
        expect_state(CommandListState::Closed, self.list_state)?;
        queue
            .execute_command_lists(&[&self.list])
            .map_err(RenderError::SubmissionFailed)?;
        self.list_state = CommandListState::Submitted;
        Ok(())
    }

    /// Lifecycle state of the direct list.
    pub fn list_state(&self) -> CommandListState {
        self.list_state
    }

    /// Lifecycle state of the bundle.
    pub fn bundle_state(&self) -> CommandListState {
        self.bundle_state
    }
}

fn expect_state(expected: CommandListState, found: CommandListState) -> Result<(), RenderError> {
    if expected == found {
        Ok(())
    } else {
        Err(RenderError::InvalidCommandListState { expected, found })
    }
}
