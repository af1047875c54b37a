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

//! Results of the informational device capability queries.
//!
//! None of these gate device creation. A query that fails for a reason other than a
//! malformed parameter leaves its entry in [`DeviceCapabilities`] as `None`.

use std::fmt;

/// A Direct3D feature level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureLevel {
    /// 1.0 core (compute only).
    Level1_0Core,
    /// 9.1
    Level9_1,
    /// 9.2
    Level9_2,
    /// 9.3
    Level9_3,
    /// 10.0
    Level10_0,
    /// 10.1
    Level10_1,
    /// 11.0
    Level11_0,
    /// 11.1
    Level11_1,
    /// 12.0
    Level12_0,
    /// 12.1
    Level12_1,
    /// 12.2
    Level12_2,
}

impl FeatureLevel {
    /// The lowest level a device is created with.
    pub const DEVICE_FLOOR: FeatureLevel = FeatureLevel::Level12_0;

    /// The levels passed to the max-feature-level query, lowest first.
    pub const QUERIED: [FeatureLevel; 5] = [
        FeatureLevel::Level11_0,
        FeatureLevel::Level11_1,
        FeatureLevel::Level12_0,
        FeatureLevel::Level12_1,
        FeatureLevel::Level12_2,
    ];
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureLevel::Level1_0Core => "1.0 core",
            FeatureLevel::Level9_1 => "9.1",
            FeatureLevel::Level9_2 => "9.2",
            FeatureLevel::Level9_3 => "9.3",
            FeatureLevel::Level10_0 => "10.0",
            FeatureLevel::Level10_1 => "10.1",
            FeatureLevel::Level11_0 => "11.0",
            FeatureLevel::Level11_1 => "11.1",
            FeatureLevel::Level12_0 => "12.0",
            FeatureLevel::Level12_1 => "12.1",
            FeatureLevel::Level12_2 => "12.2",
        };
        f.write_str(name)
    }
}

/// A shader model version, e.g. 6.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderModel {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

impl ShaderModel {
    /// The highest model the query asks about.
    pub const HIGHEST_REQUESTED: ShaderModel = ShaderModel { major: 6, minor: 7 };

    /// Decodes the packed `0xMm` representation used by the platform.
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            major: ((packed >> 4) & 0x0f) as u8,
            minor: (packed & 0x0f) as u8,
        }
    }

    /// Encodes into the packed `0xMm` representation.
    pub const fn packed(self) -> u32 {
        ((self.major as u32) << 4) | self.minor as u32
    }
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A root signature serialization version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RootSignatureVersion {
    /// Version 1.0.
    #[default]
    V1_0,
    /// Version 1.1.
    V1_1,
}

impl fmt::Display for RootSignatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootSignatureVersion::V1_0 => f.write_str("1.0"),
            RootSignatureVersion::V1_1 => f.write_str("1.1"),
        }
    }
}

/// Memory architecture of the adapter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchitectureInfo {
    /// The GPU is a tile-based renderer.
    pub tile_based_renderer: bool,
    /// Unified memory access.
    pub uma: bool,
    /// Cache-coherent unified memory access.
    pub cache_coherent_uma: bool,
    /// The GPU has an isolated memory management unit.
    pub isolated_mmu: bool,
}

/// GPU virtual address space limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualAddressSupport {
    /// Maximum virtual address bits per resource.
    pub max_bits_per_resource: u32,
    /// Maximum virtual address bits per process.
    pub max_bits_per_process: u32,
}

/// Minimum shader precision support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinPrecisionSupport {
    /// Only full precision.
    #[default]
    None,
    /// 10-bit minimum precision.
    Bits10,
    /// 16-bit minimum precision.
    Bits16,
}

impl fmt::Display for MinPrecisionSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinPrecisionSupport::None => f.write_str("none"),
            MinPrecisionSupport::Bits10 => f.write_str("10-bit"),
            MinPrecisionSupport::Bits16 => f.write_str("16-bit"),
        }
    }
}

/// The basic optional feature set of the device.
///
/// Field names mirror the platform's `D3D12_OPTIONS` feature data.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceOptions {
    pub double_precision_float_shader_ops: bool,
    pub output_merger_logic_op: bool,
    pub min_precision_support: MinPrecisionSupport,
    pub tiled_resources_tier: u32,
    pub resource_binding_tier: u32,
    pub ps_specified_stencil_ref_supported: bool,
    pub typed_uav_load_additional_formats: bool,
    pub rovs_supported: bool,
    pub conservative_rasterization_tier: u32,
    pub standard_swizzle_64kb_supported: bool,
    pub resource_heap_tier: u32,
}

/// Wave (SIMD lane) operation support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveOpsInfo {
    /// HLSL 6.0 wave operations are supported.
    pub wave_ops: bool,
    /// Baseline number of lanes in a SIMD wave.
    pub wave_lane_count_min: u32,
    /// Total number of SIMD lanes on the device.
    pub total_lane_count: u32,
    /// 64-bit integer shader operations are supported.
    pub int64_shader_ops: bool,
}

/// Identifies one capability query, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityQuery {
    /// Max supported feature level.
    FeatureLevels,
    /// Highest shader model.
    ShaderModel,
    /// Highest root signature version.
    RootSignature,
    /// Architecture of node 0.
    Architecture,
    /// GPU virtual address support.
    VirtualAddressSupport,
    /// Basic device options.
    Options,
    /// Wave operation support.
    WaveOps,
}

impl fmt::Display for CapabilityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapabilityQuery::FeatureLevels => "feature levels",
            CapabilityQuery::ShaderModel => "shader model",
            CapabilityQuery::RootSignature => "root signature",
            CapabilityQuery::Architecture => "architecture",
            CapabilityQuery::VirtualAddressSupport => "GPU virtual address support",
            CapabilityQuery::Options => "options",
            CapabilityQuery::WaveOps => "wave operations",
        };
        f.write_str(name)
    }
}

/// Everything learned from the capability queries. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Highest supported level among [`FeatureLevel::QUERIED`].
    pub max_feature_level: Option<FeatureLevel>,
    /// Highest supported shader model up to [`ShaderModel::HIGHEST_REQUESTED`].
    pub shader_model: Option<ShaderModel>,
    /// Highest supported root signature version.
    pub root_signature_version: Option<RootSignatureVersion>,
    /// Node 0 architecture.
    pub architecture: Option<ArchitectureInfo>,
    /// Virtual address limits.
    pub virtual_address: Option<VirtualAddressSupport>,
    /// Basic options.
    pub options: Option<DeviceOptions>,
    /// Wave operation support.
    pub wave_ops: Option<WaveOpsInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_levels_are_ordered() {
        assert!(FeatureLevel::Level12_1 > FeatureLevel::DEVICE_FLOOR);
        assert!(FeatureLevel::Level11_1 < FeatureLevel::DEVICE_FLOOR);
        assert_eq!(FeatureLevel::Level12_2.to_string(), "12.2");
        assert_eq!(FeatureLevel::Level1_0Core.to_string(), "1.0 core");
    }

    #[test]
    fn shader_model_packing() {
        let sm = ShaderModel::from_packed(0x65);
        assert_eq!(sm, ShaderModel { major: 6, minor: 5 });
        assert_eq!(sm.to_string(), "6.5");
        assert_eq!(ShaderModel::HIGHEST_REQUESTED.packed(), 0x67);
    }
}
