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

use super::error::OrApiError;
use super::D3D12;
use lumen_core::renderer::{ApiError, CpuDescriptorHandle, DescriptorHeap, Resource, SwapChain};
use std::ffi::c_void;
use std::ops::Range;
use std::ptr::NonNull;
use windows::Win32::Graphics::Direct3D12::{
    ID3D12DescriptorHeap, ID3D12PipelineState, ID3D12Resource, ID3D12RootSignature, D3D12_RANGE,
};
use windows::Win32::Graphics::Dxgi::{IDXGISwapChain3, DXGI_PRESENT};

/// A committed buffer or a swap-chain buffer.
pub struct D3D12Resource {
    raw: ID3D12Resource,
    size: u64,
    gpu_virtual_address: u64,
}

impl D3D12Resource {
    pub(crate) fn new(raw: ID3D12Resource) -> Self {
        let size = unsafe { raw.GetDesc() }.Width;
        let gpu_virtual_address = unsafe { raw.GetGPUVirtualAddress() };
        Self {
            raw,
            size,
            gpu_virtual_address,
        }
    }

    pub(crate) fn raw(&self) -> &ID3D12Resource {
        &self.raw
    }
}

fn d3d12_range(range: Option<Range<usize>>) -> Option<D3D12_RANGE> {
    range.map(|range| D3D12_RANGE {
        Begin: range.start,
        End: range.end,
    })
}

impl Resource for D3D12Resource {
    fn size(&self) -> u64 {
        self.size
    }

    fn gpu_virtual_address(&self) -> u64 {
        self.gpu_virtual_address
    }

    unsafe fn map(
        &self,
        subresource: u32,
        read_range: Option<Range<usize>>,
    ) -> Result<NonNull<u8>, ApiError> {
        let range = d3d12_range(read_range);
        let mut data: *mut c_void = std::ptr::null_mut();
        unsafe {
            self.raw.Map(
                subresource,
                range.as_ref().map(|r| r as *const D3D12_RANGE),
                Some(&mut data as *mut *mut c_void),
            )
        }
        .or_api_error()?;
        NonNull::new(data as *mut u8)
            .ok_or_else(|| ApiError::InvalidCall("Map returned a null pointer".to_string()))
    }

    unsafe fn unmap(&self, subresource: u32, written_range: Option<Range<usize>>) {
        let range = d3d12_range(written_range);
        unsafe {
            self.raw
                .Unmap(subresource, range.as_ref().map(|r| r as *const D3D12_RANGE))
        };
    }
}

/// A descriptor heap.
pub struct D3D12DescriptorHeap {
    raw: ID3D12DescriptorHeap,
}

impl D3D12DescriptorHeap {
    pub(crate) fn new(raw: ID3D12DescriptorHeap) -> Self {
        Self { raw }
    }
}

impl DescriptorHeap for D3D12DescriptorHeap {
    fn cpu_handle_for_heap_start(&self) -> CpuDescriptorHandle {
        let handle = unsafe { self.raw.GetCPUDescriptorHandleForHeapStart() };
        CpuDescriptorHandle { ptr: handle.ptr }
    }
}

/// A flip-model swap chain.
pub struct D3D12SwapChain {
    raw: IDXGISwapChain3,
}

impl D3D12SwapChain {
    pub(crate) fn new(raw: IDXGISwapChain3) -> Self {
        Self { raw }
    }
}

impl SwapChain<D3D12> for D3D12SwapChain {
    fn current_back_buffer_index(&self) -> u32 {
        unsafe { self.raw.GetCurrentBackBufferIndex() }
    }

    fn get_buffer(&self, index: u32) -> Result<D3D12Resource, ApiError> {
        let raw: ID3D12Resource = unsafe { self.raw.GetBuffer(index) }.or_api_error()?;
        Ok(D3D12Resource::new(raw))
    }

    fn present(&self, sync_interval: u32) -> Result<(), ApiError> {
        unsafe { self.raw.Present(sync_interval, DXGI_PRESENT(0)) }
            .ok()
            .or_api_error()
    }
}

/// A serialized and created root signature.
pub struct D3D12RootSignature {
    raw: ID3D12RootSignature,
}

impl D3D12RootSignature {
    pub(crate) fn new(raw: ID3D12RootSignature) -> Self {
        Self { raw }
    }

    pub(crate) fn raw(&self) -> &ID3D12RootSignature {
        &self.raw
    }
}

/// A graphics pipeline state object.
pub struct D3D12PipelineState {
    raw: ID3D12PipelineState,
}

impl D3D12PipelineState {
    pub(crate) fn new(raw: ID3D12PipelineState) -> Self {
        Self { raw }
    }

    pub(crate) fn raw(&self) -> &ID3D12PipelineState {
        &self.raw
    }
}
