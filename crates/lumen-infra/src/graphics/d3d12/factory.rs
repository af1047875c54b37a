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

use super::command::D3D12CommandQueue;
use super::conversions::IntoD3D12;
use super::device::D3D12Device;
use super::error::OrApiError;
use super::resource::D3D12SwapChain;
use super::D3D12;
use lumen_core::renderer::{
    Adapter, AdapterInfo, ApiError, Factory, FeatureLevel, SwapChainDescriptor,
};
use raw_window_handle::RawWindowHandle;
use std::ffi::c_void;
use windows::core::Interface;
use windows::Win32::Foundation::{BOOL, HWND};
use windows::Win32::Graphics::Direct3D12::{
    D3D12CreateDevice, D3D12GetDebugInterface, ID3D12Debug, ID3D12Device,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_ALPHA_MODE_UNSPECIFIED, DXGI_MODE_SCALING_UNSPECIFIED,
    DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED, DXGI_RATIONAL, DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, IDXGIAdapter1, IDXGIFactory4, IDXGISwapChain3, DXGI_ADAPTER_FLAG_SOFTWARE,
    DXGI_CREATE_FACTORY_DEBUG, DXGI_CREATE_FACTORY_FLAGS, DXGI_SCALING_STRETCH,
    DXGI_SWAP_CHAIN_DESC1, DXGI_SWAP_CHAIN_FULLSCREEN_DESC, DXGI_USAGE_RENDER_TARGET_OUTPUT,
};

/// The DXGI factory, entry point of the Direct3D 12 backend.
pub struct D3D12Factory {
    raw: IDXGIFactory4,
}

impl D3D12Factory {
    /// Creates the DXGI factory. With `enable_debug_layer` the D3D12 debug layer is
    /// switched on first and the factory is created in debug mode.
    pub fn new(enable_debug_layer: bool) -> Result<Self, ApiError> {
        let mut flags = DXGI_CREATE_FACTORY_FLAGS(0);
        if enable_debug_layer {
            let mut debug: Option<ID3D12Debug> = None;
            match unsafe { D3D12GetDebugInterface(&mut debug) } {
                Ok(()) => {
                    if let Some(debug) = debug {
                        unsafe { debug.EnableDebugLayer() };
                        flags = DXGI_CREATE_FACTORY_DEBUG;
                        log::info!("D3D12 debug layer enabled");
                    }
                }
                Err(e) => log::warn!("D3D12 debug layer unavailable: {e}"),
            }
        }
        let raw: IDXGIFactory4 = unsafe { CreateDXGIFactory2(flags) }.or_api_error()?;
        Ok(Self { raw })
    }
}

/// A DXGI adapter with its description captured at enumeration.
pub struct D3D12Adapter {
    raw: IDXGIAdapter1,
    info: AdapterInfo,
}

impl Adapter for D3D12Adapter {
    fn info(&self) -> AdapterInfo {
        self.info.clone()
    }
}

fn utf16_until_nul(chars: &[u16]) -> String {
    let len = chars.iter().position(|&c| c == 0).unwrap_or(chars.len());
    String::from_utf16_lossy(&chars[..len])
}

impl Factory<D3D12> for D3D12Factory {
    fn enum_adapter(&self, index: u32) -> Result<D3D12Adapter, ApiError> {
        let raw = unsafe { self.raw.EnumAdapters1(index) }.or_api_error()?;
        let desc = unsafe { raw.GetDesc1() }.or_api_error()?;
        let info = AdapterInfo {
            description: utf16_until_nul(&desc.Description),
            dedicated_video_memory: desc.DedicatedVideoMemory as u64,
            dedicated_system_memory: desc.DedicatedSystemMemory as u64,
            shared_system_memory: desc.SharedSystemMemory as u64,
            is_software: desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32 != 0,
        };
        Ok(D3D12Adapter { raw, info })
    }

    fn create_device(
        &self,
        adapter: &D3D12Adapter,
        minimum_feature_level: FeatureLevel,
    ) -> Result<D3D12Device, ApiError> {
        let mut device: Option<ID3D12Device> = None;
        unsafe {
            D3D12CreateDevice(
                &adapter.raw,
                minimum_feature_level.into_d3d12(),
                &mut device,
            )
        }
        .or_api_error()?;
        let raw = device.ok_or_else(|| {
            ApiError::InvalidCall("D3D12CreateDevice returned no device".to_string())
        })?;
        Ok(D3D12Device::new(raw))
    }

    fn create_swap_chain(
        &self,
        queue: &D3D12CommandQueue,
        window: RawWindowHandle,
        descriptor: &SwapChainDescriptor,
    ) -> Result<D3D12SwapChain, ApiError> {
        let hwnd = match window {
            RawWindowHandle::Win32(handle) => HWND(handle.hwnd.get() as *mut c_void),
            other => {
                return Err(ApiError::InvalidArgument(format!(
                    "swap chains need a Win32 window, got {other:?}"
                )))
            }
        };
        let desc = DXGI_SWAP_CHAIN_DESC1 {
            Width: descriptor.width,
            Height: descriptor.height,
            Format: descriptor.format.into_d3d12(),
            Stereo: BOOL::from(false),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: descriptor.buffer_count,
            Scaling: DXGI_SCALING_STRETCH,
            SwapEffect: descriptor.swap_effect.into_d3d12(),
            AlphaMode: DXGI_ALPHA_MODE_UNSPECIFIED,
            Flags: 0,
        };
        let (numerator, denominator) = descriptor.refresh_rate;
        let fullscreen = DXGI_SWAP_CHAIN_FULLSCREEN_DESC {
            RefreshRate: DXGI_RATIONAL {
                Numerator: numerator,
                Denominator: denominator,
            },
            ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
            Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
            Windowed: BOOL::from(descriptor.windowed),
        };
        let swap_chain = unsafe {
            self.raw
                .CreateSwapChainForHwnd(queue.raw(), hwnd, &desc, Some(&fullscreen), None)
        }
        .or_api_error()?;
        let raw: IDXGISwapChain3 = swap_chain.cast().or_api_error()?;
        Ok(D3D12SwapChain::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_descriptions_stop_at_the_first_nul() {
        let mut raw = [0u16; 128];
        for (slot, c) in raw.iter_mut().zip("WARP".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(utf16_until_nul(&raw), "WARP");
        assert_eq!(utf16_until_nul(&[0x41, 0x42]), "AB");
    }
}
