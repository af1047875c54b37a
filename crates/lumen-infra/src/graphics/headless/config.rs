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

//! The simulated adapters and GPU behavior of the headless backend.

use lumen_core::renderer::{
    AdapterInfo, ArchitectureInfo, DeviceOptions, FeatureLevel, MinPrecisionSupport,
    RootSignatureVersion, ShaderModel, VirtualAddressSupport, WaveOpsInfo,
};

const GIB: u64 = 1024 * 1024 * 1024;

/// Everything a simulated adapter reports.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessAdapterDesc {
    pub info: AdapterInfo,
    /// The highest feature level a device on this adapter supports.
    pub feature_level: FeatureLevel,
    pub shader_model: ShaderModel,
    pub root_signature_version: RootSignatureVersion,
    pub architecture: ArchitectureInfo,
    pub virtual_address: VirtualAddressSupport,
    pub options: DeviceOptions,
    /// `None` makes the wave-ops query report the feature as unsupported.
    pub wave_ops: Option<WaveOpsInfo>,
}

impl HeadlessAdapterDesc {
    /// A discrete GPU with dedicated video memory.
    pub fn hardware(description: &str, feature_level: FeatureLevel) -> Self {
        Self {
            info: AdapterInfo {
                description: description.to_string(),
                dedicated_video_memory: 4 * GIB,
                dedicated_system_memory: 0,
                shared_system_memory: 8 * GIB,
                is_software: false,
            },
            feature_level,
            shader_model: ShaderModel { major: 6, minor: 6 },
            root_signature_version: RootSignatureVersion::V1_1,
            architecture: ArchitectureInfo::default(),
            virtual_address: VirtualAddressSupport {
                max_bits_per_resource: 40,
                max_bits_per_process: 47,
            },
            options: DeviceOptions {
                double_precision_float_shader_ops: true,
                output_merger_logic_op: true,
                min_precision_support: MinPrecisionSupport::Bits16,
                tiled_resources_tier: 3,
                resource_binding_tier: 3,
                ps_specified_stencil_ref_supported: true,
                typed_uav_load_additional_formats: true,
                rovs_supported: true,
                conservative_rasterization_tier: 3,
                standard_swizzle_64kb_supported: false,
                resource_heap_tier: 2,
            },
            wave_ops: Some(WaveOpsInfo {
                wave_ops: true,
                wave_lane_count_min: 32,
                total_lane_count: 4096,
                int64_shader_ops: true,
            }),
        }
    }

    /// A software rasterizer sharing system memory, like WARP.
    pub fn software(description: &str) -> Self {
        let mut desc = Self::hardware(description, FeatureLevel::Level12_1);
        desc.info.dedicated_video_memory = 0;
        desc.info.dedicated_system_memory = 0;
        desc.info.shared_system_memory = 16 * GIB;
        desc.info.is_software = true;
        desc.architecture = ArchitectureInfo {
            tile_based_renderer: false,
            uma: true,
            cache_coherent_uma: true,
            isolated_mmu: false,
        };
        desc.shader_model = ShaderModel { major: 6, minor: 2 };
        desc.options.min_precision_support = MinPrecisionSupport::None;
        desc.wave_ops = None;
        desc
    }
}

/// Configuration of a [`HeadlessFactory`](super::HeadlessFactory).
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConfig {
    /// Adapters in enumeration order.
    pub adapters: Vec<HeadlessAdapterDesc>,
    /// When set, queue signals complete as soon as they are issued. Otherwise they
    /// stay pending until an event wait drains the simulated GPU.
    pub gpu_completes_immediately: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            adapters: vec![
                HeadlessAdapterDesc::hardware("Lumen Headless GPU", FeatureLevel::Level12_1),
                HeadlessAdapterDesc::software("Lumen Headless Software Adapter"),
            ],
            gpu_completes_immediately: false,
        }
    }
}

impl HeadlessConfig {
    /// A configuration exposing exactly `adapters`.
    pub fn with_adapters(adapters: Vec<HeadlessAdapterDesc>) -> Self {
        Self {
            adapters,
            ..Self::default()
        }
    }
}
