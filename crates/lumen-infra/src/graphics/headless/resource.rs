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

//! Simulated resources, descriptor heaps, swap chains and pipeline objects.

use super::fault::Call;
use super::state::{ResourceKey, TrackedObject};
use super::tracker::ObjectKind;
use super::Headless;
use lumen_core::renderer::{
    ApiError, CpuDescriptorHandle, DescriptorHeap, HeapType, Resource, ResourceState, SwapChain,
};
use std::cell::{Cell, UnsafeCell};
use std::ops::Range;
use std::ptr::NonNull;
use std::rc::Rc;

/// Highest sync interval a present accepts.
pub const MAX_SYNC_INTERVAL: u32 = 4;

/// A buffer or a reference to a swap-chain buffer.
#[derive(Debug)]
pub struct HeadlessResource {
    pub(crate) tracked: TrackedObject,
    pub(crate) key: ResourceKey,
    size: u64,
    gpu_virtual_address: u64,
    heap: Option<HeapType>,
    storage: Option<UnsafeCell<Box<[u8]>>>,
    map_count: Cell<u32>,
}

impl HeadlessResource {
    pub(crate) fn buffer(
        tracked: TrackedObject,
        key: ResourceKey,
        size: u64,
        heap: HeapType,
    ) -> Result<Self, ApiError> {
        let len = usize::try_from(size)
            .map_err(|_| ApiError::InvalidArgument(format!("buffer size {size} too large")))?;
        Ok(Self {
            tracked,
            key,
            size,
            gpu_virtual_address: 0x1_0000_0000 + key.0 * 0x1_0000,
            heap: Some(heap),
            storage: Some(UnsafeCell::new(vec![0u8; len].into_boxed_slice())),
            map_count: Cell::new(0),
        })
    }

    pub(crate) fn back_buffer(tracked: TrackedObject, key: ResourceKey, size: u64) -> Self {
        Self {
            tracked,
            key,
            size,
            gpu_virtual_address: 0,
            heap: None,
            storage: None,
            map_count: Cell::new(0),
        }
    }

    /// The identity of the memory this resource references.
    pub fn key(&self) -> ResourceKey {
        self.key
    }
}

impl Resource for HeadlessResource {
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
        self.tracked.shared().enter(Call::Map)?;
        if subresource != 0 {
            return Err(ApiError::InvalidArgument(format!(
                "buffers have a single subresource, got {subresource}"
            )));
        }
        if let Some(range) = &read_range {
            if range.start > range.end || range.end as u64 > self.size {
                return Err(ApiError::InvalidArgument(format!(
                    "read range {range:?} outside a {} byte buffer",
                    self.size
                )));
            }
        }
        let storage = match (&self.storage, self.heap) {
            (Some(storage), Some(HeapType::Upload | HeapType::Readback)) => storage,
            _ => {
                return Err(ApiError::InvalidCall(
                    "resource is not in a CPU-visible heap".to_string(),
                ))
            }
        };
        self.map_count.set(self.map_count.get() + 1);
        // SAFETY: the boxed storage lives as long as `self` and is only reached
        // through the returned pointer while mapped.
        let bytes = unsafe { &mut *storage.get() };
        NonNull::new(bytes.as_mut_ptr())
            .ok_or_else(|| ApiError::InvalidCall("buffer storage is empty".to_string()))
    }

    unsafe fn unmap(&self, _subresource: u32, _written_range: Option<Range<usize>>) {
        match self.map_count.get() {
            0 => self
                .tracked
                .shared()
                .validation_error(format!("{} unmapped while not mapped", self.key)),
            count => self.map_count.set(count - 1),
        }
    }
}

/// A simulated descriptor heap; handles are plain addresses.
#[derive(Debug)]
pub struct HeadlessDescriptorHeap {
    pub(crate) tracked: TrackedObject,
    pub(crate) base: usize,
}

impl DescriptorHeap for HeadlessDescriptorHeap {
    fn cpu_handle_for_heap_start(&self) -> CpuDescriptorHandle {
        CpuDescriptorHandle { ptr: self.base }
    }
}

/// A simulated flip-model swap chain.
#[derive(Debug)]
pub struct HeadlessSwapChain {
    pub(crate) tracked: TrackedObject,
    pub(crate) buffers: Vec<ResourceKey>,
    pub(crate) buffer_size: u64,
    pub(crate) current: Cell<u32>,
}

impl SwapChain<Headless> for HeadlessSwapChain {
    fn current_back_buffer_index(&self) -> u32 {
        self.current.get()
    }

    fn get_buffer(&self, index: u32) -> Result<HeadlessResource, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::GetBuffer)?;
        let key = *self.buffers.get(index as usize).ok_or_else(|| {
            ApiError::InvalidArgument(format!(
                "buffer index {index} out of range for {} buffers",
                self.buffers.len()
            ))
        })?;
        let tracked = shared.track(ObjectKind::BackBuffer(index));
        Ok(HeadlessResource::back_buffer(tracked, key, self.buffer_size))
    }

    fn present(&self, sync_interval: u32) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::Present)?;
        if sync_interval > MAX_SYNC_INTERVAL {
            return Err(ApiError::InvalidArgument(format!(
                "sync interval {sync_interval} exceeds {MAX_SYNC_INTERVAL}"
            )));
        }
        let current = self.current.get();
        let key = self.buffers[current as usize];
        let buffer_state = state.resource_states.get(&key).copied();
        if buffer_state != Some(ResourceState::Present) {
            state.validation_error(format!(
                "back buffer {current} presented in state {}",
                buffer_state.map_or_else(|| "unknown".to_string(), |s| s.to_string())
            ));
        }
        state.log.presents += 1;
        self.current.set((current + 1) % self.buffers.len() as u32);
        Ok(())
    }
}

/// A simulated root signature. Keeps the 32-bit value count of each parameter for
/// command validation.
#[derive(Debug)]
pub struct HeadlessRootSignature {
    pub(crate) tracked: TrackedObject,
    pub(crate) parameters: Rc<[u32]>,
    pub(crate) allows_input_layout: bool,
}

/// A simulated pipeline state object.
#[derive(Debug)]
pub struct HeadlessPipelineState {
    pub(crate) tracked: TrackedObject,
}

impl HeadlessPipelineState {
    /// Tracking id, for logs.
    pub fn id(&self) -> u64 {
        self.tracked.id().0
    }
}
