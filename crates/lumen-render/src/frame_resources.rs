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

//! The swap chain, its back buffers and their render-target views.

use lumen_core::renderer::{
    Api, CpuDescriptorHandle, DescriptorHeap, DescriptorHeapDescriptor, DescriptorHeapType, Device,
    Factory, RenderError, ScissorRect, SwapChain, SwapChainDescriptor, Viewport,
};
use lumen_core::ApiError;
use raw_window_handle::RawWindowHandle;

/// Owns the swap chain, one render-target view per back buffer and the heap the
/// views live in.
///
/// Fields are released top to bottom: back buffers, heap, swap chain.
pub struct FrameResources<A: Api> {
    render_targets: Vec<A::Resource>,
    rtv_heap: A::DescriptorHeap,
    swap_chain: A::SwapChain,
    rtv_base: CpuDescriptorHandle,
    rtv_stride: u32,
    back_buffer_index: u32,
    width: u32,
    height: u32,
}

impl<A: Api> FrameResources<A> {
    /// Creates the swap chain on `queue` and a view for each of its back buffers.
    pub fn new(
        factory: &A::Factory,
        device: &A::Device,
        queue: &A::CommandQueue,
        window: RawWindowHandle,
        width: u32,
        height: u32,
        frame_count: u32,
    ) -> Result<Self, RenderError> {
        let swap_chain =
            Self::create_swap_chain(factory, queue, window, width, height, frame_count)?;
        let (rtv_heap, render_targets, rtv_stride) =
            Self::create_render_target_views(device, &swap_chain, frame_count)?;
        let rtv_base = rtv_heap.cpu_handle_for_heap_start();
        let back_buffer_index = swap_chain.current_back_buffer_index();

        log::debug!(
            "Created {}x{} swap chain with {} back buffers",
            width,
            height,
            frame_count
        );

        Ok(Self {
            render_targets,
            rtv_heap,
            swap_chain,
            rtv_base,
            rtv_stride,
            back_buffer_index,
            width,
            height,
        })
    }

    /// Creates a windowed flip-sequential swap chain of `frame_count` buffers
    /// presenting through `queue`.
    pub fn create_swap_chain(
        factory: &A::Factory,
        queue: &A::CommandQueue,
        window: RawWindowHandle,
        width: u32,
        height: u32,
        frame_count: u32,
    ) -> Result<A::SwapChain, RenderError> {
        let descriptor = SwapChainDescriptor::windowed(width, height, frame_count);
        factory
            .create_swap_chain(queue, window, &descriptor)
            .map_err(RenderError::SwapChainCreationFailed)
    }

    /// Creates a heap of `frame_count` render-target views and fills slot `i` with a
    /// view of back buffer `i`. Returns the heap, the back buffers and the
    /// descriptor stride.
    pub fn create_render_target_views(
        device: &A::Device,
        swap_chain: &A::SwapChain,
        frame_count: u32,
    ) -> Result<(A::DescriptorHeap, Vec<A::Resource>, u32), RenderError> {
        let heap = device
            .create_descriptor_heap(&DescriptorHeapDescriptor::render_targets(frame_count))
            .map_err(RenderError::DescriptorHeapCreationFailed)?;
        let stride = device.descriptor_handle_increment_size(DescriptorHeapType::RenderTargetView);
        let base = heap.cpu_handle_for_heap_start();

        let mut render_targets = Vec::with_capacity(frame_count as usize);
        for index in 0..frame_count {
            let buffer = swap_chain
                .get_buffer(index)
                .map_err(|source| RenderError::RenderTargetViewFailed { index, source })?;
            // Owned by the list before its view exists, so a failure releases the
            // buffers in index order.
            render_targets.push(buffer);
            device
                .create_render_target_view(
                    &render_targets[index as usize],
                    base.offset(index, stride),
                )
                .map_err(|source| RenderError::RenderTargetViewFailed { index, source })?;
        }
        Ok((heap, render_targets, stride))
    }

    /// The view of back buffer `index`: `base + index * stride`.
    pub fn rtv_handle(&self, index: u32) -> Option<CpuDescriptorHandle> {
        (index < self.frame_count()).then(|| self.rtv_base.offset(index, self.rtv_stride))
    }

    /// Back buffer `index`.
    pub fn back_buffer(&self, index: u32) -> Option<&A::Resource> {
        self.render_targets.get(index as usize)
    }

    /// The back buffer the next frame renders into, with its view.
    pub fn current_target(&self) -> Result<(&A::Resource, CpuDescriptorHandle), RenderError> {
        let index = self.back_buffer_index;
        match (self.back_buffer(index), self.rtv_handle(index)) {
            (Some(buffer), Some(rtv)) => Ok((buffer, rtv)),
            _ => Err(RenderError::RecordingFailed(ApiError::InvalidArgument(
                format!(
                    "back buffer index {} out of range 0..{}",
                    index,
                    self.frame_count()
                ),
            ))),
        }
    }

    /// Presents the current back buffer.
    pub fn present(&self, sync_interval: u32) -> Result<(), RenderError> {
        self.swap_chain
            .present(sync_interval)
            .map_err(RenderError::PresentFailed)
    }

    /// Re-reads the current back-buffer index from the swap chain.
    pub fn refresh_back_buffer_index(&mut self) -> u32 {
        self.back_buffer_index = self.swap_chain.current_back_buffer_index();
        self.back_buffer_index
    }

    /// The back-buffer index as of the last refresh.
    pub fn back_buffer_index(&self) -> u32 {
        self.back_buffer_index
    }

    /// Number of back buffers.
    pub fn frame_count(&self) -> u32 {
        self.render_targets.len() as u32
    }

    /// Full-target viewport.
    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }

    /// Full-target scissor rectangle.
    pub fn scissor_rect(&self) -> ScissorRect {
        ScissorRect::full(self.width, self.height)
    }

    /// The swap chain.
    pub fn swap_chain(&self) -> &A::SwapChain {
        &self.swap_chain
    }

    /// The render-target heap.
    pub fn rtv_heap(&self) -> &A::DescriptorHeap {
        &self.rtv_heap
    }
}
