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

//! Committed buffer descriptions.

/// The memory heap a committed resource is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapType {
    /// GPU-local memory, not CPU accessible.
    Default,
    /// CPU-writable, GPU-readable memory.
    Upload,
    /// GPU-writable, CPU-readable memory.
    Readback,
}

/// Describes a committed buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// Size in bytes.
    pub size: u64,
    /// The heap the buffer lives in.
    pub heap: HeapType,
    /// The state the buffer is created in.
    pub initial_state: super::ResourceState,
}

impl BufferDescriptor {
    /// An upload heap buffer of `size` bytes, in the generic read state the heap
    /// requires.
    pub fn upload(size: u64) -> Self {
        Self {
            size,
            heap: HeapType::Upload,
            initial_state: super::ResourceState::GenericRead,
        }
    }
}
