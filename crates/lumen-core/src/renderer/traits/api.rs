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

use super::{
    CommandAllocator, CommandQueue, DescriptorHeap, Device, Event, Fence, GraphicsCommandList,
    Resource, SwapChain,
};
use crate::renderer::api::{AdapterInfo, FeatureLevel, SwapChainDescriptor};
use crate::renderer::error::ApiError;
use raw_window_handle::RawWindowHandle;

/// Names the concrete object types of one backend.
pub trait Api: Sized + 'static {
    /// Short backend name used in logs.
    const NAME: &'static str;

    /// Entry point: adapter enumeration, device and swap-chain creation.
    type Factory: Factory<Self>;
    /// A physical or virtual adapter.
    type Adapter: Adapter;
    /// The logical device.
    type Device: Device<Self>;
    /// A command queue.
    type CommandQueue: CommandQueue<Self>;
    /// Backing memory of one kind of command list.
    type CommandAllocator: CommandAllocator;
    /// A direct command list or a bundle.
    type CommandList: GraphicsCommandList<Self>;
    /// A window swap chain.
    type SwapChain: SwapChain<Self>;
    /// A descriptor heap.
    type DescriptorHeap: DescriptorHeap;
    /// A buffer or a back buffer.
    type Resource: Resource;
    /// A root signature.
    type RootSignature;
    /// A graphics pipeline state object.
    type PipelineState;
    /// A GPU/CPU fence.
    type Fence: Fence<Self>;
    /// A waitable OS event.
    type Event: Event;
}

/// Enumerates adapters and creates the objects that are not created by a device.
pub trait Factory<A: Api> {
    /// Returns the adapter at `index`, or [`ApiError::NotFound`] past the last one.
    fn enum_adapter(&self, index: u32) -> Result<A::Adapter, ApiError>;

    /// Creates a device on `adapter` supporting at least `minimum_feature_level`.
    fn create_device(
        &self,
        adapter: &A::Adapter,
        minimum_feature_level: FeatureLevel,
    ) -> Result<A::Device, ApiError>;

    /// Creates a swap chain presenting to `window`, bound to `queue`.
    fn create_swap_chain(
        &self,
        queue: &A::CommandQueue,
        window: RawWindowHandle,
        descriptor: &SwapChainDescriptor,
    ) -> Result<A::SwapChain, ApiError>;
}

/// A physical or virtual GPU.
pub trait Adapter {
    /// Description and memory sizes.
    fn info(&self) -> AdapterInfo;
}
