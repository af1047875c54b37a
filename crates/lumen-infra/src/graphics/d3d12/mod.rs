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

//! The Direct3D 12 backend, built on the `windows` crate.
//!
//! Each type wraps one COM interface; dropping it releases the interface. The
//! only resource not owned by COM is the fence event, closed in its `Drop`.

mod command;
mod conversions;
mod device;
mod error;
mod factory;
mod resource;
mod sync;

pub use self::command::{D3D12CommandAllocator, D3D12CommandList, D3D12CommandQueue};
pub use self::conversions::IntoD3D12;
pub use self::device::D3D12Device;
pub use self::factory::{D3D12Adapter, D3D12Factory};
pub use self::resource::{
    D3D12DescriptorHeap, D3D12PipelineState, D3D12Resource, D3D12RootSignature, D3D12SwapChain,
};
pub use self::sync::{D3D12Event, D3D12Fence};

use lumen_core::renderer::Api;

/// The Direct3D 12 backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct D3D12;

impl Api for D3D12 {
    const NAME: &'static str = "d3d12";

    type Factory = D3D12Factory;
    type Adapter = D3D12Adapter;
    type Device = D3D12Device;
    type CommandQueue = D3D12CommandQueue;
    type CommandAllocator = D3D12CommandAllocator;
    type CommandList = D3D12CommandList;
    type SwapChain = D3D12SwapChain;
    type DescriptorHeap = D3D12DescriptorHeap;
    type Resource = D3D12Resource;
    type RootSignature = D3D12RootSignature;
    type PipelineState = D3D12PipelineState;
    type Fence = D3D12Fence;
    type Event = D3D12Event;
}
