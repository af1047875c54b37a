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

mod common;

use anyhow::Result;
use common::{assert_clean_teardown, build};
use lumen_core::renderer::{
    AdapterInfo, CapabilityQuery, FeatureLevel, RootSignatureVersion, ShaderModel,
    MAX_ADAPTER_COUNT,
};
use lumen_core::{ApiError, RenderError};
use lumen_infra::graphics::headless::{
    Call, FaultPlan, Headless, HeadlessAdapterDesc, HeadlessConfig, HeadlessFactory,
};
use lumen_render::DeviceContext;

#[test]
fn every_usable_adapter_reaches_the_device_floor() -> Result<()> {
    for adapter in 0..2 {
        let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), adapter);
        let context = context?;
        let device = context.device_context();
        assert_eq!(device.adapter_index(), adapter);
        assert!(device.capabilities().max_feature_level >= Some(FeatureLevel::DEVICE_FLOOR));
        drop(context);
        assert_clean_teardown(&inspector);
    }
    Ok(())
}

#[test]
fn hardware_adapter_report() -> Result<()> {
    let (context, _inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let context = context?;
    let device = context.device_context();
    let caps = device.capabilities();

    assert!(!device.adapter_info().is_software);
    assert_eq!(device.adapter_info().dedicated_video_memory_gib(), 4.0);
    assert_eq!(caps.max_feature_level, Some(FeatureLevel::Level12_1));
    assert_eq!(caps.shader_model, Some(ShaderModel { major: 6, minor: 6 }));
    assert_eq!(caps.root_signature_version, Some(RootSignatureVersion::V1_1));
    assert!(caps.architecture.is_some());
    assert!(caps.virtual_address.is_some());
    assert!(caps.options.is_some());
    assert!(caps.wave_ops.is_some_and(|w| w.wave_ops));
    Ok(())
}

#[test]
fn software_adapter_leaves_wave_ops_unknown() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 1);
    let context = context?;
    let device = context.device_context();

    assert!(device.adapter_info().is_software);
    assert_eq!(device.capabilities().wave_ops, None);
    assert_eq!(
        device.capabilities().shader_model,
        Some(ShaderModel { major: 6, minor: 2 })
    );
    assert!(device.capabilities().architecture.is_some_and(|a| a.uma));
    assert!(inspector.validation_messages().is_empty());
    Ok(())
}

#[test]
fn unsupported_queries_are_informational() -> Result<()> {
    // The wave-ops query is the seventh feature-support check.
    let faults = FaultPlan::none().and_fail_nth(
        Call::CheckFeatureSupport,
        7,
        ApiError::Unsupported("OPTIONS1".into()),
    );
    let (context, _inspector) = build(HeadlessConfig::default(), faults, 0);
    let context = context?;
    let caps = context.device_context().capabilities();
    assert_eq!(caps.wave_ops, None);
    assert!(caps.options.is_some());
    Ok(())
}

#[test]
fn malformed_queries_abort_setup() {
    let faults = FaultPlan::none().and_fail_nth(
        Call::CheckFeatureSupport,
        2,
        ApiError::InvalidArgument("struct size mismatch".into()),
    );
    let (result, inspector) = build(HeadlessConfig::default(), faults, 0);
    assert!(matches!(
        result,
        Err(RenderError::CapabilityQueryFailed {
            query: CapabilityQuery::ShaderModel,
            source: ApiError::InvalidArgument(_),
        })
    ));
    assert_eq!(inspector.call_count(Call::CreateCommandQueue), 0);
    assert_clean_teardown(&inspector);
}

#[test]
fn adapters_below_the_floor_cannot_host_the_device() -> Result<()> {
    let adapters = || {
        HeadlessConfig::with_adapters(vec![
            HeadlessAdapterDesc::hardware("Legacy GPU", FeatureLevel::Level11_0),
            HeadlessAdapterDesc::hardware("Current GPU", FeatureLevel::Level12_0),
        ])
    };

    let (result, inspector) = build(adapters(), FaultPlan::none(), 0);
    match result {
        Err(RenderError::DeviceCreationFailed {
            adapter_index,
            source,
        }) => {
            assert_eq!(adapter_index, 0);
            assert!(matches!(source, ApiError::Unsupported(_)));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("device created below feature level 12.0"),
    }
    assert_clean_teardown(&inspector);

    let (context, _inspector) = build(adapters(), FaultPlan::none(), 1);
    let context = context?;
    assert_eq!(
        context.device_context().capabilities().max_feature_level,
        Some(FeatureLevel::Level12_0)
    );
    Ok(())
}

#[test]
fn out_of_range_choices_fall_back_to_the_first_adapter() -> Result<()> {
    let (context, _inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 7);
    assert_eq!(context?.device_context().adapter_index(), 0);

    let factory = HeadlessFactory::default();
    let mut offered = Vec::new();
    let mut selector = |adapters: &[AdapterInfo]| {
        offered = adapters.iter().map(|a| a.description.clone()).collect();
        Some(-1)
    };
    let device = DeviceContext::<Headless>::initialize(&factory, &mut selector)?;
    assert_eq!(device.adapter_index(), 0);
    assert_eq!(
        offered,
        vec![
            "Lumen Headless GPU".to_string(),
            "Lumen Headless Software Adapter".to_string()
        ]
    );
    Ok(())
}

#[test]
fn enumeration_stops_at_the_adapter_limit() -> Result<()> {
    let many = (0..MAX_ADAPTER_COUNT + 4)
        .map(|i| HeadlessAdapterDesc::hardware(&format!("GPU {i}"), FeatureLevel::Level12_0))
        .collect();
    let factory = HeadlessFactory::new(HeadlessConfig::with_adapters(many));
    let inspector = factory.inspector();

    let adapters = DeviceContext::<Headless>::enumerate_adapters(&factory)?;
    assert_eq!(adapters.len(), MAX_ADAPTER_COUNT);
    assert_eq!(inspector.call_count(Call::EnumAdapter), MAX_ADAPTER_COUNT as u32);
    Ok(())
}
