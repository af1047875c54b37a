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

use common::{assert_clean_teardown, build, config, FRAME_COUNT};
use lumen_core::renderer::{
    CapabilityQuery, CommandListType, FixedAdapter, InMemoryShaderSource, RenderConfig,
};
use lumen_core::{ApiError, RenderError};
use lumen_infra::graphics::headless::{
    Call, FaultPlan, Headless, HeadlessConfig, HeadlessFactory, ObjectKind,
};
use lumen_infra::platform::window::HeadlessWindow;
use lumen_render::RenderContext;

type Expectation = fn(&RenderError) -> bool;

fn stage_faults() -> Vec<(&'static str, FaultPlan, Expectation)> {
    let oom = || ApiError::OutOfMemory;
    vec![
        (
            "adapter enumeration",
            FaultPlan::fail(Call::EnumAdapter, oom()),
            |e: &RenderError| matches!(e, RenderError::NoAdapters),
        ),
        (
            "device",
            FaultPlan::fail(Call::CreateDevice, oom()),
            |e: &RenderError| matches!(e, RenderError::DeviceCreationFailed { adapter_index: 0, .. }),
        ),
        (
            "feature level query",
            FaultPlan::fail(
                Call::CheckFeatureSupport,
                ApiError::InvalidArgument("bad struct size".into()),
            ),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CapabilityQueryFailed {
                        query: CapabilityQuery::FeatureLevels,
                        ..
                    }
                )
            },
        ),
        (
            "direct allocator",
            FaultPlan::fail(Call::CreateCommandAllocator(CommandListType::Direct), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandAllocatorCreationFailed {
                        kind: CommandListType::Direct,
                        ..
                    }
                )
            },
        ),
        (
            "bundle allocator",
            FaultPlan::fail(Call::CreateCommandAllocator(CommandListType::Bundle), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandAllocatorCreationFailed {
                        kind: CommandListType::Bundle,
                        ..
                    }
                )
            },
        ),
        (
            "command queue",
            FaultPlan::fail(Call::CreateCommandQueue, oom()),
            |e: &RenderError| matches!(e, RenderError::CommandQueueCreationFailed(_)),
        ),
        (
            "swap chain",
            FaultPlan::fail(Call::CreateSwapChain, oom()),
            |e: &RenderError| matches!(e, RenderError::SwapChainCreationFailed(_)),
        ),
        (
            "descriptor heap",
            FaultPlan::fail(Call::CreateDescriptorHeap, oom()),
            |e: &RenderError| matches!(e, RenderError::DescriptorHeapCreationFailed(_)),
        ),
        (
            "second back buffer",
            FaultPlan::none().and_fail_nth(Call::GetBuffer, 2, oom()),
            |e: &RenderError| matches!(e, RenderError::RenderTargetViewFailed { index: 1, .. }),
        ),
        (
            "third render target view",
            FaultPlan::none().and_fail_nth(Call::CreateRenderTargetView, 3, oom()),
            |e: &RenderError| matches!(e, RenderError::RenderTargetViewFailed { index: 2, .. }),
        ),
        (
            "root signature",
            FaultPlan::fail(Call::CreateRootSignature, oom()),
            |e: &RenderError| matches!(e, RenderError::RootSignatureCreationFailed(_)),
        ),
        (
            "fence",
            FaultPlan::fail(Call::CreateFence, oom()),
            |e: &RenderError| matches!(e, RenderError::FenceCreationFailed(_)),
        ),
        (
            "event",
            FaultPlan::fail(Call::CreateEvent, oom()),
            |e: &RenderError| matches!(e, RenderError::FenceCreationFailed(_)),
        ),
        (
            "pipeline state",
            FaultPlan::fail(Call::CreatePipelineState, oom()),
            |e: &RenderError| matches!(e, RenderError::PipelineStateCreationFailed(_)),
        ),
        (
            "direct command list",
            FaultPlan::fail(Call::CreateCommandList(CommandListType::Direct), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandListCreationFailed {
                        kind: CommandListType::Direct,
                        ..
                    }
                )
            },
        ),
        (
            "closing the new direct list",
            FaultPlan::fail(Call::CloseCommandList(CommandListType::Direct), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandListCreationFailed {
                        kind: CommandListType::Direct,
                        ..
                    }
                )
            },
        ),
        (
            "bundle",
            FaultPlan::fail(Call::CreateCommandList(CommandListType::Bundle), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandListCreationFailed {
                        kind: CommandListType::Bundle,
                        ..
                    }
                )
            },
        ),
        (
            "vertex buffer",
            FaultPlan::fail(Call::CreateCommittedResource, oom()),
            |e: &RenderError| matches!(e, RenderError::VertexBufferFailed(_)),
        ),
        (
            "vertex buffer map",
            FaultPlan::fail(Call::Map, oom()),
            |e: &RenderError| matches!(e, RenderError::VertexBufferFailed(_)),
        ),
        (
            "closing the bundle",
            FaultPlan::fail(Call::CloseCommandList(CommandListType::Bundle), oom()),
            |e: &RenderError| {
                matches!(
                    e,
                    RenderError::CommandListCreationFailed {
                        kind: CommandListType::Bundle,
                        ..
                    }
                )
            },
        ),
        (
            "initial wait",
            FaultPlan::fail(Call::Signal, ApiError::DeviceRemoved("reset".into())),
            |e: &RenderError| matches!(e, RenderError::SynchronizationFailed(_)),
        ),
        (
            "first present",
            FaultPlan::fail(Call::Present, ApiError::DeviceRemoved("hung".into())),
            |e: &RenderError| matches!(e, RenderError::PresentFailed(_)),
        ),
    ]
}

#[test]
fn a_failure_at_any_setup_stage_releases_everything_created_so_far() {
    for (stage, faults, expected) in stage_faults() {
        let (result, inspector) = build(HeadlessConfig::default(), faults, 0);
        let err = match result {
            Ok(_) => panic!("setup succeeded despite a {stage} failure"),
            Err(err) => err,
        };
        assert!(expected(&err), "{stage}: unexpected error {err}");
        assert_clean_teardown(&inspector);
    }
}

#[test]
fn a_failed_bundle_releases_the_direct_list_before_anything_older() {
    // --- Setup ---
    let faults = FaultPlan::fail(
        Call::CreateCommandList(CommandListType::Bundle),
        ApiError::OutOfMemory,
    );
    let (result, inspector) = build(HeadlessConfig::default(), faults, 0);
    assert!(matches!(
        result,
        Err(RenderError::CommandListCreationFailed {
            kind: CommandListType::Bundle,
            ..
        })
    ));

    // --- Teardown ---
    let created = inspector.creation_order();
    assert!(!created.contains(&ObjectKind::Fence));
    assert!(!created.contains(&ObjectKind::Event));

    let mut expected = vec![
        ObjectKind::CommandList(CommandListType::Direct),
        ObjectKind::PipelineState,
        ObjectKind::RootSignature,
    ];
    expected.extend((0..FRAME_COUNT).map(ObjectKind::BackBuffer));
    expected.extend([
        ObjectKind::DescriptorHeap,
        ObjectKind::SwapChain,
        ObjectKind::CommandQueue,
        ObjectKind::CommandAllocator(CommandListType::Bundle),
        ObjectKind::CommandAllocator(CommandListType::Direct),
        ObjectKind::Device,
        ObjectKind::Factory,
    ]);
    let released: Vec<ObjectKind> = inspector
        .release_order()
        .into_iter()
        .filter(|kind| *kind != ObjectKind::Adapter)
        .collect();
    assert_eq!(released, expected);
    assert_clean_teardown(&inspector);
}

#[test]
fn the_fence_is_created_after_the_vertex_upload() {
    let (result, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let context = result.expect("setup succeeds");
    let created = inspector.creation_order();
    let position = |kind: ObjectKind| {
        created
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_else(|| panic!("{kind} was never created"))
    };
    assert!(position(ObjectKind::Buffer) < position(ObjectKind::Fence));
    assert!(position(ObjectKind::Fence) < position(ObjectKind::Event));
    drop(context);
    assert_clean_teardown(&inspector);
}

#[test]
fn a_late_enumeration_failure_keeps_the_adapters_found_so_far() {
    let faults = FaultPlan::none().and_fail_nth(Call::EnumAdapter, 2, ApiError::OutOfMemory);
    let (result, inspector) = build(HeadlessConfig::default(), faults, 1);
    let context = result.expect("the first adapter is still usable");
    // Adapter 1 was never enumerated, so the choice falls back to adapter 0.
    assert_eq!(context.device_context().adapter_index(), 0);
    drop(context);
    assert_clean_teardown(&inspector);
}

#[test]
fn no_adapters_at_all() {
    let (result, inspector) = build(HeadlessConfig::with_adapters(Vec::new()), FaultPlan::none(), 0);
    assert!(matches!(result, Err(RenderError::NoAdapters)));
    assert_eq!(inspector.creation_order(), vec![ObjectKind::Factory]);
    assert_clean_teardown(&inspector);
}

#[test]
fn missing_shader_bytecode_fails_the_pipeline_stage() {
    let factory = HeadlessFactory::new(HeadlessConfig::default());
    let inspector = factory.inspector();
    let config = config();
    let window = HeadlessWindow::new(config.width, config.height);
    let shaders = InMemoryShaderSource::new(b"DXBC-vertex".to_vec(), Vec::new());

    let result = RenderContext::<Headless>::new(
        factory,
        &window,
        &config,
        &mut FixedAdapter(0),
        &shaders,
    );
    match result {
        Err(RenderError::ShaderLoadFailed { reason, .. }) => assert!(reason.contains("pixel")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("setup succeeded without pixel shader bytecode"),
    }
    assert_eq!(inspector.call_count(Call::CreatePipelineState), 0);
    assert_clean_teardown(&inspector);
}

#[test]
fn invalid_configuration_is_rejected_before_any_device_work() {
    let factory = HeadlessFactory::new(HeadlessConfig::default());
    let inspector = factory.inspector();
    let config = RenderConfig {
        frame_count: 1,
        ..config()
    };
    let window = HeadlessWindow::new(config.width, config.height);

    let result = RenderContext::<Headless>::new(
        factory,
        &window,
        &config,
        &mut FixedAdapter(0),
        &common::shaders(),
    );
    assert!(matches!(result, Err(RenderError::InvalidConfiguration(_))));
    assert_eq!(inspector.call_count(Call::EnumAdapter), 0);
    assert_clean_teardown(&inspector);
}
