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

//! Descriptor heaps and CPU descriptor handles.

/// The kind of descriptors a heap stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorHeapType {
    /// Render-target views.
    RenderTargetView,
    /// Constant buffer, shader resource and unordered access views.
    CbvSrvUav,
}

/// Describes a descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorHeapDescriptor {
    /// What the heap stores.
    pub kind: DescriptorHeapType,
    /// How many descriptors it holds.
    pub num_descriptors: u32,
    /// Whether shaders can see the heap. Render-target heaps never are.
    pub shader_visible: bool,
}

impl DescriptorHeapDescriptor {
    /// A CPU-only heap of `count` render-target views.
    pub fn render_targets(count: u32) -> Self {
        Self {
            kind: DescriptorHeapType::RenderTargetView,
            num_descriptors: count,
            shader_visible: false,
        }
    }
}

/// The CPU address of one descriptor inside a heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CpuDescriptorHandle {
    /// Opaque address.
    pub ptr: usize,
}

impl CpuDescriptorHandle {
    /// The handle `index` descriptors past `self`, for a heap whose descriptors are
    /// `increment` bytes apart.
    pub fn offset(self, index: u32, increment: u32) -> Self {
        Self {
            ptr: self.ptr + index as usize * increment as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_strided_from_the_heap_start() {
        let base = CpuDescriptorHandle { ptr: 0x4000 };
        assert_eq!(base.offset(0, 32), base);
        assert_eq!(base.offset(3, 32).ptr, 0x4000 + 96);
    }
}
