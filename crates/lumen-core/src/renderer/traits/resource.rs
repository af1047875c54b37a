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

use crate::renderer::error::ApiError;
use std::ops::Range;
use std::ptr::NonNull;

/// A GPU resource.
pub trait Resource {
    /// Size in bytes.
    fn size(&self) -> u64;

    /// GPU virtual address of a buffer; 0 for textures.
    fn gpu_virtual_address(&self) -> u64;

    /// Maps `subresource` into CPU memory. `read_range` is the range the CPU will
    /// read; `Some(0..0)` declares that it reads nothing, `None` that it may read
    /// everything.
    ///
    /// # Safety
    ///
    /// The pointer is valid for [`Resource::size`] bytes until the matching
    /// [`Resource::unmap`]. The caller must not access it afterwards, nor while the
    /// GPU may be writing the resource.
    unsafe fn map(
        &self,
        subresource: u32,
        read_range: Option<Range<usize>>,
    ) -> Result<NonNull<u8>, ApiError>;

    /// Unmaps `subresource`. `written_range` is the range the CPU wrote, `None` for
    /// everything.
    ///
    /// # Safety
    ///
    /// Must pair with a successful [`Resource::map`]; the mapped pointer is dangling
    /// afterwards.
    unsafe fn unmap(&self, subresource: u32, written_range: Option<Range<usize>>);
}
