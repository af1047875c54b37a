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

/// The logical device: capability queries and object creation.
///
/// The `check_*` queries are informational. A backend reports a feature the device
/// lacks as [`ApiError::Unsupported`] and a malformed request as
/// [`ApiError::InvalidArgument`].
pub trait Device<A: Api> {
    /// The highest of `requested` the device supports.
    fn check_feature_levels(&self, requested: &[FeatureLevel]) -> Result<FeatureLevel, ApiError>;

    /// The highest shader model supported, at most `highest`.
    fn check_shader_model(&self, highest: ShaderModel) -> Result<ShaderModel, ApiError>;

    /// The highest root signature version supported, at most `highest`.
    fn check_root_signature_version(
        &self,
        highest: RootSignatureVersion,
    ) -> Result<RootSignatureVersion, ApiError>;

    /// Memory architecture of node `node_index`.
    fn check_architecture(&self, node_index: u32) -> Result<ArchitectureInfo, ApiError>;

    /// GPU virtual address limits.
    fn check_virtual_address_support(&self) -> Result<VirtualAddressSupport, ApiError>;

    /// Basic optional features.
    fn check_options(&self) -> Result<DeviceOptions, ApiError>;

    /// Wave operation support.
    fn check_wave_ops(&self) -> Result<WaveOpsInfo, ApiError>;

    /// Creates a command queue.
    fn create_command_queue(
        &self,
        descriptor: &CommandQueueDescriptor,
    ) -> Result<A::CommandQueue, ApiError>;

    /// Creates the allocator backing command lists of `kind`.
    fn create_command_allocator(&self, kind: CommandListType)
        -> Result<A::CommandAllocator, ApiError>;

    /// Creates a command list of `kind` recording into `allocator`. The list starts
    /// open, with `initial_state` bound.
    fn create_command_list(
        &self,
        kind: CommandListType,
        allocator: &A::CommandAllocator,
        initial_state: Option<&A::PipelineState>,
    ) -> Result<A::CommandList, ApiError>;

    /// Creates a descriptor heap.
    fn create_descriptor_heap(
        &self,
        descriptor: &DescriptorHeapDescriptor,
    ) -> Result<A::DescriptorHeap, ApiError>;

    /// Distance in bytes between two descriptors of `kind` in a heap.
    fn descriptor_handle_increment_size(&self, kind: DescriptorHeapType) -> u32;

    /// Writes a render-target view of `resource` at `destination`.
    fn create_render_target_view(
        &self,
        resource: &A::Resource,
        destination: CpuDescriptorHandle,
    ) -> Result<(), ApiError>;

    /// Serializes `descriptor` and creates the root signature from the blob.
    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Result<A::RootSignature, ApiError>;

    /// Bakes a graphics pipeline state object.
    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineDescriptor<'_, A::RootSignature>,
    ) -> Result<A::PipelineState, ApiError>;

    /// Creates a buffer with its own implicit heap.
    fn create_committed_buffer(&self, descriptor: &BufferDescriptor)
        -> Result<A::Resource, ApiError>;

    /// Creates a fence holding `initial_value`.
    fn create_fence(&self, initial_value: u64) -> Result<A::Fence, ApiError>;

    /// Creates an auto-reset event for fence completion.
    fn create_event(&self) -> Result<A::Event, ApiError>;
}
