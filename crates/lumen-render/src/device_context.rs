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

//! Adapter selection, logical device creation and the capability report.

use lumen_core::renderer::{
    Adapter, AdapterInfo, AdapterSelector, Api, ApiError, CapabilityQuery, Device,
    DeviceCapabilities, Factory, FeatureLevel, RenderError, RootSignatureVersion, ShaderModel,
    MAX_ADAPTER_COUNT,
};

/// Maps the raw adapter choice onto a valid index. Anything absent, negative or past
/// the end selects adapter 0.
pub fn resolve_adapter_index(requested: Option<i64>, adapter_count: usize) -> usize {
    match requested {
        Some(index) if index >= 0 && (index as u64) < adapter_count as u64 => index as usize,
        Some(index) => {
            log::warn!(
                "Adapter index {} is out of range (0..{}), using adapter 0",
                index,
                adapter_count
            );
            0
        }
        None => {
            log::warn!("No adapter selected, using adapter 0");
            0
        }
    }
}

/// Owns the logical device and what was learned about it.
///
/// The adapters enumerated to create it are not retained.
pub struct DeviceContext<A: Api> {
    device: A::Device,
    adapter_index: usize,
    adapter_info: AdapterInfo,
    capabilities: DeviceCapabilities,
}

impl<A: Api> DeviceContext<A> {
    /// Enumerates at most [`MAX_ADAPTER_COUNT`] adapters.
    ///
    /// Enumeration stops at the first index the factory does not know. Any other
    /// failure is logged and also ends the enumeration.
    pub fn enumerate_adapters(factory: &A::Factory) -> Result<Vec<A::Adapter>, RenderError> {
        let mut adapters = Vec::new();
        for index in 0..MAX_ADAPTER_COUNT as u32 {
            match factory.enum_adapter(index) {
                Ok(adapter) => adapters.push(adapter),
                Err(ApiError::NotFound) => break,
                Err(e) => {
                    log::warn!("Enumerating adapter {} failed: {}", index, e);
                    break;
                }
            }
        }
        if adapters.is_empty() {
            return Err(RenderError::NoAdapters);
        }
        log::debug!("{} adapter(s) found via {}", adapters.len(), A::NAME);
        Ok(adapters)
    }

    /// Enumerates the adapters, lets `selector` choose one and creates the device on
    /// it with a feature level of at least 12.0.
    pub fn initialize(
        factory: &A::Factory,
        selector: &mut dyn AdapterSelector,
    ) -> Result<Self, RenderError> {
        let adapters = Self::enumerate_adapters(factory)?;
        let infos: Vec<AdapterInfo> = adapters.iter().map(|a| a.info()).collect();
        let adapter_index = resolve_adapter_index(selector.select(&infos), adapters.len());
        let adapter_info = infos[adapter_index].clone();

        let device = factory
            .create_device(&adapters[adapter_index], FeatureLevel::DEVICE_FLOOR)
            .map_err(|source| RenderError::DeviceCreationFailed {
                adapter_index,
                source,
            })?;

        log::info!("Using adapter {}: {}", adapter_index, adapter_info.description);
        log::info!(
            "  Dedicated video memory: {:.1} GiB",
            adapter_info.dedicated_video_memory_gib()
        );
        log::info!(
            "  Dedicated system memory: {:.1} GiB",
            adapter_info.dedicated_system_memory_gib()
        );
        log::info!(
            "  Shared system memory: {:.1} GiB",
            adapter_info.shared_system_memory_gib()
        );

        Ok(Self {
            device,
            adapter_index,
            adapter_info,
            capabilities: DeviceCapabilities::default(),
        })
    }

    /// Runs every capability query and logs the report.
    ///
    /// A query that fails because the device lacks the feature leaves its entry
    /// unknown. A query that fails because it was malformed is fatal.
    pub fn query_capabilities(&mut self) -> Result<&DeviceCapabilities, RenderError> {
        let device = &self.device;
        let caps = DeviceCapabilities {
            max_feature_level: informational(
                CapabilityQuery::FeatureLevels,
                device.check_feature_levels(&FeatureLevel::QUERIED),
            )?,
            shader_model: informational(
                CapabilityQuery::ShaderModel,
                device.check_shader_model(ShaderModel::HIGHEST_REQUESTED),
            )?,
            root_signature_version: informational(
                CapabilityQuery::RootSignature,
                device.check_root_signature_version(RootSignatureVersion::V1_1),
            )?,
            architecture: informational(
                CapabilityQuery::Architecture,
                device.check_architecture(0),
            )?,
            virtual_address: informational(
                CapabilityQuery::VirtualAddressSupport,
                device.check_virtual_address_support(),
            )?,
            options: informational(CapabilityQuery::Options, device.check_options())?,
            wave_ops: informational(CapabilityQuery::WaveOps, device.check_wave_ops())?,
        };
        log_capabilities(&caps);
        self.capabilities = caps;
        Ok(&self.capabilities)
    }

    /// The logical device.
    pub fn device(&self) -> &A::Device {
        &self.device
    }

    /// Index of the adapter the device was created on.
    pub fn adapter_index(&self) -> usize {
        self.adapter_index
    }

    /// Description of that adapter.
    pub fn adapter_info(&self) -> &AdapterInfo {
        &self.adapter_info
    }

    /// The last capability report.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }
}

fn informational<T>(
    query: CapabilityQuery,
    result: Result<T, ApiError>,
) -> Result<Option<T>, RenderError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(source) if source.is_malformed_parameter() => {
            Err(RenderError::CapabilityQueryFailed { query, source })
        }
        Err(e) => {
            log::warn!("Capability query `{}` failed, treating as unknown: {}", query, e);
            Ok(None)
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn log_capabilities(caps: &DeviceCapabilities) {
    if let Some(level) = caps.max_feature_level {
        log::info!("Max supported feature level: {}", level);
    }
    if let Some(model) = caps.shader_model {
        log::info!("Highest shader model: {}", model);
    }
    if let Some(version) = caps.root_signature_version {
        log::info!("Highest root signature version: {}", version);
    }
    if let Some(arch) = caps.architecture {
        log::info!("Tile based renderer: {}", yes_no(arch.tile_based_renderer));
        log::info!("UMA: {}", yes_no(arch.uma));
        log::info!("Cache coherent UMA: {}", yes_no(arch.cache_coherent_uma));
        log::info!("Isolated MMU: {}", yes_no(arch.isolated_mmu));
    }
    if let Some(va) = caps.virtual_address {
        log::info!(
            "GPU virtual address bits: {} per resource, {} per process",
            va.max_bits_per_resource,
            va.max_bits_per_process
        );
    }
    if let Some(opts) = caps.options {
        log::info!(
            "Double precision shader ops: {}",
            yes_no(opts.double_precision_float_shader_ops)
        );
        log::info!("Output merger logic op: {}", yes_no(opts.output_merger_logic_op));
        log::info!("Min precision support: {}", opts.min_precision_support);
        log::info!("Tiled resources tier: {}", opts.tiled_resources_tier);
        log::info!("Resource binding tier: {}", opts.resource_binding_tier);
        log::info!(
            "PS specified stencil ref: {}",
            yes_no(opts.ps_specified_stencil_ref_supported)
        );
        log::info!(
            "Typed UAV load additional formats: {}",
            yes_no(opts.typed_uav_load_additional_formats)
        );
        log::info!("ROVs: {}", yes_no(opts.rovs_supported));
        log::info!(
            "Conservative rasterization tier: {}",
            opts.conservative_rasterization_tier
        );
        log::info!(
            "Standard swizzle 64KB: {}",
            yes_no(opts.standard_swizzle_64kb_supported)
        );
        log::info!("Resource heap tier: {}", opts.resource_heap_tier);
    }
    if let Some(wave) = caps.wave_ops {
        log::info!("Wave ops: {}", yes_no(wave.wave_ops));
        log::info!("Wave lane count min: {}", wave.wave_lane_count_min);
        log::info!("Total lane count: {}", wave.total_lane_count);
        log::info!("Int64 shader ops: {}", yes_no(wave.int64_shader_ops));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_choices_are_kept() {
        assert_eq!(resolve_adapter_index(Some(0), 3), 0);
        assert_eq!(resolve_adapter_index(Some(2), 3), 2);
    }

    #[test]
    fn invalid_choices_fall_back_to_the_first_adapter() {
        assert_eq!(resolve_adapter_index(Some(3), 3), 0);
        assert_eq!(resolve_adapter_index(Some(-1), 3), 0);
        assert_eq!(resolve_adapter_index(None, 3), 0);
    }

    #[test]
    fn unsupported_queries_are_unknown_but_malformed_ones_are_fatal() {
        let unknown: Result<Option<u32>, _> = informational(
            CapabilityQuery::WaveOps,
            Err(ApiError::Unsupported("wave ops".into())),
        );
        assert!(matches!(unknown, Ok(None)));

        let fatal: Result<Option<u32>, _> = informational(
            CapabilityQuery::ShaderModel,
            Err(ApiError::InvalidArgument("highest shader model".into())),
        );
        assert!(matches!(
            fatal,
            Err(RenderError::CapabilityQueryFailed {
                query: CapabilityQuery::ShaderModel,
                ..
            })
        ));
    }
}
