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
use common::{assert_clean_teardown, build, FRAME_COUNT};
use lumen_core::renderer::{CommandListState, CommandListType, ResourceState};
use lumen_infra::graphics::headless::{Call, FaultPlan, HeadlessConfig, ObjectKind};
use lumen_render::{RotationAngle, QUAD_VERTICES};

#[test]
fn setup_renders_the_first_frame() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let context = context?;

    assert_eq!(context.frame_number(), 1);
    assert_eq!(inspector.presents(), 1);
    assert_eq!(inspector.draws(), 1);
    assert_eq!(inspector.root_constants(), vec![0.0f32.to_bits()]);
    assert_eq!(context.frame_resources().back_buffer_index(), 1);
    assert!(context.frame_fence().is_idle());
    assert_eq!(context.commands().bundle_state(), CommandListState::Closed);
    assert_eq!(context.commands().list_state(), CommandListState::Submitted);
    assert!(inspector.validation_messages().is_empty());
    Ok(())
}

#[test]
fn a_full_turn_cycles_buffers_and_wraps_the_rotation() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let mut context = context?;

    // --- Render until 360 frames have been pushed ---
    let mut last_fence = context.frame_fence().value();
    for expected_frame in 2..=360u64 {
        let stats = context.render_frame()?;
        assert_eq!(stats.frame_number, expected_frame);
        assert_eq!(stats.back_buffer_index, ((expected_frame - 1) % 5) as u32);
        assert_eq!(stats.next_back_buffer_index, (expected_frame % 5) as u32);
        assert_eq!(stats.rotation_degrees(), (expected_frame - 1) as f32);
        assert_eq!(stats.fence_value, last_fence + 1);
        assert_eq!(context.frame_fence().completed_value(), stats.fence_value);
        last_fence = stats.fence_value;
    }

    assert_eq!(context.rotation().degrees(), 0.0);
    let pushed: Vec<f32> = inspector
        .root_constants()
        .into_iter()
        .map(f32::from_bits)
        .collect();
    assert_eq!(pushed.len(), 360);
    assert!(pushed.iter().all(|d| *d >= 0.0 && *d < RotationAngle::FULL_TURN));
    assert_eq!(pushed[359], 359.0);

    let log = inspector.frame_log();
    assert_eq!(log.presents, 360);
    assert_eq!(log.draws, 360);
    assert_eq!(log.clears, 360);
    assert_eq!(log.executed_lists, 360);
    assert!(inspector.validation_messages().is_empty());

    // --- Teardown ---
    context.shutdown()?;
    assert_clean_teardown(&inspector);
    Ok(())
}

#[test]
fn every_frame_transitions_its_back_buffer_there_and_back() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let mut context = context?;
    for _ in 0..(2 * FRAME_COUNT) {
        context.render_frame()?;
    }

    let barriers = inspector.barriers();
    assert_eq!(barriers.len(), 2 * (2 * FRAME_COUNT as usize + 1));
    for pair in barriers.chunks_exact(2) {
        assert_eq!(pair[0].resource, pair[1].resource);
        assert_eq!(
            (pair[0].before, pair[0].after),
            (ResourceState::Present, ResourceState::RenderTarget)
        );
        assert_eq!(
            (pair[1].before, pair[1].after),
            (ResourceState::RenderTarget, ResourceState::Present)
        );
        assert_eq!(
            inspector.resource_state(pair[0].resource),
            Some(ResourceState::Present)
        );
    }

    // Frame n and frame n + FRAME_COUNT render into the same buffer, and a full
    // cycle touches every buffer once.
    let targets: Vec<_> = barriers.chunks_exact(2).map(|pair| pair[0].resource).collect();
    let cycle = FRAME_COUNT as usize;
    for (i, target) in targets.iter().enumerate().skip(cycle) {
        assert_eq!(*target, targets[i - cycle]);
    }
    let mut first_cycle = targets[..cycle].to_vec();
    first_cycle.sort();
    first_cycle.dedup();
    assert_eq!(first_cycle.len(), cycle);
    Ok(())
}

#[test]
fn uploaded_vertices_read_back_unchanged() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let mut context = context?;
    context.render_frame()?;

    assert_eq!(context.geometry().read_back()?, QUAD_VERTICES.to_vec());
    assert_eq!(context.geometry().vertex_count(), 4);
    assert_eq!(inspector.call_count(Call::Map), 2);
    Ok(())
}

#[test]
fn every_frame_waits_on_the_event_unless_the_gpu_is_already_done() -> Result<()> {
    // --- A GPU that only advances when waited on ---
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    let mut context = context?;
    context.render_frame()?;
    context.render_frame()?;
    // One wait at setup, one per frame.
    assert_eq!(inspector.frame_log().event_waits, 4);
    drop(context);

    // --- A GPU that finishes on submission ---
    let eager = HeadlessConfig {
        gpu_completes_immediately: true,
        ..HeadlessConfig::default()
    };
    let (context, inspector) = build(eager, FaultPlan::none(), 0);
    let mut context = context?;
    context.render_frame()?;
    assert_eq!(inspector.frame_log().event_waits, 0);
    assert_eq!(inspector.call_count(Call::SetEventOnCompletion), 0);
    assert!(context.frame_fence().is_idle());
    Ok(())
}

#[test]
fn teardown_releases_in_reverse_dependency_order() -> Result<()> {
    let (context, inspector) = build(HeadlessConfig::default(), FaultPlan::none(), 0);
    drop(context?);

    let expected = vec![
        // Enumerated adapters go as soon as the device exists.
        ObjectKind::Adapter,
        ObjectKind::Adapter,
        ObjectKind::Event,
        ObjectKind::Fence,
        ObjectKind::Buffer,
        ObjectKind::CommandList(CommandListType::Bundle),
        ObjectKind::CommandList(CommandListType::Direct),
        ObjectKind::PipelineState,
        ObjectKind::RootSignature,
        ObjectKind::BackBuffer(0),
        ObjectKind::BackBuffer(1),
        ObjectKind::BackBuffer(2),
        ObjectKind::BackBuffer(3),
        ObjectKind::BackBuffer(4),
        ObjectKind::DescriptorHeap,
        ObjectKind::SwapChain,
        ObjectKind::CommandQueue,
        ObjectKind::CommandAllocator(CommandListType::Bundle),
        ObjectKind::CommandAllocator(CommandListType::Direct),
        ObjectKind::Device,
        ObjectKind::Factory,
    ];
    assert_eq!(inspector.release_order(), expected);
    assert_clean_teardown(&inspector);
    Ok(())
}

#[test]
fn frame_failures_surface_and_still_tear_down_cleanly() -> Result<()> {
    // The first present belongs to setup.
    let faults = FaultPlan::none()
        .and_fail_nth(
            Call::Present,
            2,
            lumen_core::ApiError::DeviceRemoved("hung".into()),
        )
        .and_fail_nth(
            Call::ExecuteCommandLists,
            4,
            lumen_core::ApiError::OutOfMemory,
        );
    let (context, inspector) = build(HeadlessConfig::default(), faults, 0);
    let mut context = context?;

    let err = context.render_frame().unwrap_err();
    assert!(matches!(err, lumen_core::RenderError::PresentFailed(_)));
    assert!(!err.is_setup_failure());

    // The failed frame was still waited for, so its allocator can be reused.
    assert!(context.frame_fence().is_idle());
    context.render_frame()?;

    let err = context.render_frame().unwrap_err();
    assert!(matches!(err, lumen_core::RenderError::SubmissionFailed(_)));
    assert_eq!(context.commands().list_state(), CommandListState::Closed);

    context.render_frame()?;
    drop(context);
    assert_clean_teardown(&inspector);
    Ok(())
}

#[test]
fn shutdown_waits_for_a_submission_whose_signal_failed() -> Result<()> {
    // --- Setup ---
    // Signals 1 and 2 belong to the initial wait and the first frame.
    let faults = FaultPlan::none().and_fail_nth(
        Call::Signal,
        3,
        lumen_core::ApiError::DeviceRemoved("hung".into()),
    );
    let (context, inspector) = build(HeadlessConfig::default(), faults, 0);
    let mut context = context?;
    let value_before = context.frame_fence().value();

    // --- Failed frame ---
    let err = context.render_frame().unwrap_err();
    assert!(matches!(err, lumen_core::RenderError::SynchronizationFailed(_)));
    assert_eq!(context.frame_fence().value(), value_before);
    assert!(!context.frame_fence().is_idle());

    // --- Shutdown ---
    context.shutdown()?;
    assert_eq!(inspector.call_count(Call::Signal), 4);
    assert_clean_teardown(&inspector);
    Ok(())
}
