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
use lumen_core::renderer::{ApiError, Event, Fence};
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0};
use windows::Win32::Graphics::Direct3D12::ID3D12Fence;
use windows::Win32::System::Threading::{WaitForSingleObject, INFINITE};

/// A GPU/CPU fence.
pub struct D3D12Fence {
    raw: ID3D12Fence,
}

impl D3D12Fence {
    pub(crate) fn new(raw: ID3D12Fence) -> Self {
        Self { raw }
    }

    pub(crate) fn raw(&self) -> &ID3D12Fence {
        &self.raw
    }
}

impl Fence<D3D12> for D3D12Fence {
    fn completed_value(&self) -> u64 {
        unsafe { self.raw.GetCompletedValue() }
    }

    fn set_event_on_completion(&self, value: u64, event: &D3D12Event) -> Result<(), ApiError> {
        unsafe { self.raw.SetEventOnCompletion(value, event.handle) }.or_api_error()
    }
}

/// An auto-reset Win32 event, closed on drop.
pub struct D3D12Event {
    handle: HANDLE,
}

impl D3D12Event {
    pub(crate) fn new(handle: HANDLE) -> Self {
        Self { handle }
    }
}

impl Event for D3D12Event {
    fn wait(&self) -> Result<(), ApiError> {
        let result = unsafe { WaitForSingleObject(self.handle, INFINITE) };
        if result == WAIT_OBJECT_0 {
            Ok(())
        } else {
            Err(ApiError::WaitFailed(format!(
                "WaitForSingleObject returned 0x{:x}",
                result.0
            )))
        }
    }
}

impl Drop for D3D12Event {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.handle) } {
            log::error!("Failed to close the fence event: {e}");
        }
    }
}
