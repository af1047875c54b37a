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

use super::conversions::IntoD3D12;
use super::error::OrApiError;
use super::resource::{D3D12PipelineState, D3D12Resource, D3D12RootSignature};
use super::sync::D3D12Fence;
use super::D3D12;
use lumen_core::renderer::{
    ApiError, CommandAllocator, CommandListType, CommandQueue, CpuDescriptorHandle,
    GraphicsCommandList, PrimitiveTopology, ScissorRect, TransitionBarrier, VertexBufferView,
    Viewport,
};
use std::mem::ManuallyDrop;
use windows::core::Interface;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;

/// A direct command queue.
pub struct D3D12CommandQueue {
    raw: ID3D12CommandQueue,
}

impl D3D12CommandQueue {
    pub(crate) fn new(raw: ID3D12CommandQueue) -> Self {
        Self { raw }
    }

    pub(crate) fn raw(&self) -> &ID3D12CommandQueue {
        &self.raw
    }
}

impl CommandQueue<D3D12> for D3D12CommandQueue {
    fn execute_command_lists(&self, lists: &[&D3D12CommandList]) -> Result<(), ApiError> {
        let lists = lists
            .iter()
            .map(|list| list.raw.cast::<ID3D12CommandList>().map(Some))
            .collect::<windows::core::Result<Vec<_>>>()
            .or_api_error()?;
        unsafe { self.raw.ExecuteCommandLists(&lists) };
        Ok(())
    }

    fn signal(&self, fence: &D3D12Fence, value: u64) -> Result<(), ApiError> {
        unsafe { self.raw.Signal(fence.raw(), value) }.or_api_error()
    }
}

/// Backing memory for one kind of command list.
pub struct D3D12CommandAllocator {
    raw: ID3D12CommandAllocator,
}

impl D3D12CommandAllocator {
    pub(crate) fn new(raw: ID3D12CommandAllocator) -> Self {
        Self { raw }
    }

    pub(crate) fn raw(&self) -> &ID3D12CommandAllocator {
        &self.raw
    }
}

impl CommandAllocator for D3D12CommandAllocator {
    fn reset(&self) -> Result<(), ApiError> {
        unsafe { self.raw.Reset() }.or_api_error()
    }
}

/// A graphics command list: either the per-frame direct list or a bundle.
pub struct D3D12CommandList {
    raw: ID3D12GraphicsCommandList,
    kind: CommandListType,
}

impl D3D12CommandList {
    pub(crate) fn new(raw: ID3D12GraphicsCommandList, kind: CommandListType) -> Self {
        Self { raw, kind }
    }
}

/// Builds a transition barrier that borrows `resource` without adding a reference.
fn transition_barrier(
    resource: &ID3D12Resource,
    before: D3D12_RESOURCE_STATES,
    after: D3D12_RESOURCE_STATES,
) -> D3D12_RESOURCE_BARRIER {
    D3D12_RESOURCE_BARRIER {
        Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
        Anonymous: D3D12_RESOURCE_BARRIER_0 {
            Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                // SAFETY: the copy is wrapped in `ManuallyDrop` and never released,
                // and the barrier does not outlive `resource`.
                pResource: unsafe { std::mem::transmute_copy(resource) },
                Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
                StateBefore: before,
                StateAfter: after,
            }),
        },
    }
}

impl GraphicsCommandList<D3D12> for D3D12CommandList {
    fn kind(&self) -> CommandListType {
        self.kind
    }

    fn reset(
        &mut self,
        allocator: &D3D12CommandAllocator,
        initial_state: Option<&D3D12PipelineState>,
    ) -> Result<(), ApiError> {
        unsafe {
            self.raw
                .Reset(allocator.raw(), initial_state.map(D3D12PipelineState::raw))
        }
        .or_api_error()
    }

    fn close(&mut self) -> Result<(), ApiError> {
        unsafe { self.raw.Close() }.or_api_error()
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        let viewports: Vec<D3D12_VIEWPORT> = viewports.iter().map(|v| v.into_d3d12()).collect();
        unsafe { self.raw.RSSetViewports(&viewports) };
    }

    fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        let rects: Vec<RECT> = rects.iter().map(|r| r.into_d3d12()).collect();
        unsafe { self.raw.RSSetScissorRects(&rects) };
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier<'_, D3D12Resource>]) {
        let barriers: Vec<D3D12_RESOURCE_BARRIER> = barriers
            .iter()
            .map(|barrier| {
                transition_barrier(
                    barrier.resource.raw(),
                    barrier.before.into_d3d12(),
                    barrier.after.into_d3d12(),
                )
            })
            .collect();
        unsafe { self.raw.ResourceBarrier(&barriers) };
    }

    fn set_render_targets(&mut self, render_targets: &[CpuDescriptorHandle]) {
        let handles: Vec<D3D12_CPU_DESCRIPTOR_HANDLE> =
            render_targets.iter().map(|h| h.into_d3d12()).collect();
        unsafe {
            self.raw
                .OMSetRenderTargets(handles.len() as u32, Some(handles.as_ptr()), false, None)
        };
    }

    fn clear_render_target_view(&mut self, render_target: CpuDescriptorHandle, color: [f32; 4]) {
        unsafe {
            self.raw
                .ClearRenderTargetView(render_target.into_d3d12(), &color, None)
        };
    }

    fn set_graphics_root_signature(&mut self, root_signature: &D3D12RootSignature) {
        unsafe { self.raw.SetGraphicsRootSignature(root_signature.raw()) };
    }

    fn set_graphics_root_32bit_constant(
        &mut self,
        root_parameter_index: u32,
        value: u32,
        dest_offset_in_32bit_values: u32,
    ) {
        unsafe {
            self.raw.SetGraphicsRoot32BitConstant(
                root_parameter_index,
                value,
                dest_offset_in_32bit_values,
            )
        };
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        unsafe { self.raw.IASetPrimitiveTopology(topology.into_d3d12()) };
    }

    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]) {
        let views: Vec<D3D12_VERTEX_BUFFER_VIEW> = views.iter().map(|v| v.into_d3d12()).collect();
        unsafe { self.raw.IASetVertexBuffers(start_slot, Some(&views)) };
    }

    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex_location: u32,
        start_instance_location: u32,
    ) {
        unsafe {
            self.raw.DrawInstanced(
                vertex_count_per_instance,
                instance_count,
                start_vertex_location,
                start_instance_location,
            )
        };
    }

    fn execute_bundle(&mut self, bundle: &D3D12CommandList) {
        unsafe { self.raw.ExecuteBundle(&bundle.raw) };
    }
}
