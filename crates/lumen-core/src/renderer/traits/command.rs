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

use super::Api;
use crate::renderer::api::*;
use crate::renderer::error::ApiError;

/// An ordered execution channel.
pub trait CommandQueue<A: Api> {
    /// Submits closed lists for execution, in order.
    fn execute_command_lists(&self, lists: &[&A::CommandList]) -> Result<(), ApiError>;

    /// Sets `fence` to `value` once all previously submitted work has completed.
    fn signal(&self, fence: &A::Fence, value: u64) -> Result<(), ApiError>;
}

/// Backing memory for command list recording.
pub trait CommandAllocator {
    /// Reclaims the memory. Every list recorded from it must have finished on the GPU.
    fn reset(&self) -> Result<(), ApiError>;
}

/// A direct command list or a bundle.
///
/// Recording commands are only valid while the list is open. Bundles reject
/// viewport, scissor, barrier, render-target and clear commands; backends with a
/// validation layer report those misuses instead of failing the call.
pub trait GraphicsCommandList<A: Api> {
    /// The kind this list was created as.
    fn kind(&self) -> CommandListType;

    /// Reopens the list against `allocator`, binding `initial_state`.
    fn reset(
        &mut self,
        allocator: &A::CommandAllocator,
        initial_state: Option<&A::PipelineState>,
    ) -> Result<(), ApiError>;

    /// Finishes recording.
    fn close(&mut self) -> Result<(), ApiError>;

    /// Sets the rasterizer viewports.
    fn set_viewports(&mut self, viewports: &[Viewport]);

    /// Sets the scissor rectangles.
    fn set_scissor_rects(&mut self, rects: &[ScissorRect]);

    /// Records resource state transitions.
    fn resource_barrier(&mut self, barriers: &[TransitionBarrier<'_, A::Resource>]);

    /// Binds render-target views.
    fn set_render_targets(&mut self, render_targets: &[CpuDescriptorHandle]);

    /// Clears a render-target view to `color`.
    fn clear_render_target_view(&mut self, render_target: CpuDescriptorHandle, color: [f32; 4]);

    /// Binds the graphics root signature.
    fn set_graphics_root_signature(&mut self, root_signature: &A::RootSignature);

    /// Sets one 32-bit root constant.
    fn set_graphics_root_32bit_constant(
        &mut self,
        root_parameter_index: u32,
        value: u32,
        dest_offset_in_32bit_values: u32,
    );

    /// Sets the input assembler topology.
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Binds vertex buffers starting at `start_slot`.
    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]);

    /// Draws non-indexed, instanced primitives.
    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex_location: u32,
        start_instance_location: u32,
    );

    /// Replays a closed bundle.
    fn execute_bundle(&mut self, bundle: &A::CommandList);
}
