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
use crate::renderer::api::CpuDescriptorHandle;
use crate::renderer::error::ApiError;

/// A rotation of back buffers presented to a window.
pub trait SwapChain<A: Api> {
    /// Index of the back buffer the next frame renders into.
    fn current_back_buffer_index(&self) -> u32;

    /// Returns back buffer `index`.
    fn get_buffer(&self, index: u32) -> Result<A::Resource, ApiError>;

    /// Presents the current back buffer and advances the rotation.
    fn present(&self, sync_interval: u32) -> Result<(), ApiError>;
}

/// A contiguous table of descriptors.
pub trait DescriptorHeap {
    /// CPU handle of the first descriptor.
    fn cpu_handle_for_heap_start(&self) -> CpuDescriptorHandle;
}
