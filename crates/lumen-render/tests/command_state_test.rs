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
use common::shaders;
use lumen_core::platform::RenderWindow;
use lumen_core::renderer::{CommandListState, CommandQueueDescriptor, Device, FixedAdapter};
use lumen_core::{ApiError, RenderError};
use lumen_infra::graphics::headless::{Headless, HeadlessFactory};
use lumen_infra::platform::window::HeadlessWindow;
use lumen_render::{
    CommandAllocators, CommandEngine, DeviceContext, FrameFence, FrameResources, FrameTargets,
    PipelineLayer, QuadGeometry, RotationAngle,
};

fn out_of_order(
    expected: CommandListState,
    found: CommandListState,
) -> impl Fn(&RenderError) -> bool {
    move |err| match err {
        RenderError::InvalidCommandListState {
            expected: e,
            found: f,
        } => *e == expected && *f == found,
        _ => false,
    }
}

#[test]
fn lists_follow_open_closed_submitted() -> Result<()> {
    // --- Setup, one component at a time ---
    let factory = HeadlessFactory::default();
    let inspector = factory.inspector();
    let device = DeviceContext::<Headless>::initialize(&factory, &mut FixedAdapter(0))?;
    let allocators = CommandAllocators::<Headless>::new(device.device())?;
    let queue = device
        .device()
        .create_command_queue(&CommandQueueDescriptor::default())?;
    let window = HeadlessWindow::new(64, 64);
    let frames = FrameResources::<Headless>::new(
        &factory,
        device.device(),
        &queue,
        window.raw_window_handle().expect("headless handle"),
        64,
        64,
        2,
    )?;
    let root_signature = PipelineLayer::<Headless>::create_root_signature(device.device())?;
    let pipeline_state = PipelineLayer::<Headless>::create_pipeline_state(
        device.device(),
        &root_signature,
        &shaders(),
    )?;
    let mut fence = FrameFence::<Headless>::new(device.device())?;
    let geometry = QuadGeometry::<Headless>::create_and_upload(device.device())?;
    let mut commands = CommandEngine::new(device.device(), &allocators, &pipeline_state)?;

    assert_eq!(commands.list_state(), CommandListState::Closed);
    assert_eq!(commands.bundle_state(), CommandListState::Open);

    let (back_buffer, rtv) = frames.current_target()?;
    let targets = FrameTargets {
        pipeline_state: &pipeline_state,
        root_signature: &root_signature,
        back_buffer,
        rtv,
        viewport: frames.viewport(),
        scissor: frames.scissor_rect(),
        clear_color: [0.0, 0.0, 0.0, 1.0],
    };
    let mut rotation = RotationAngle::new(1.0);

    // --- The bundle must be recorded before any frame ---
    let err = commands
        .populate(&allocators, &targets, &mut rotation)
        .unwrap_err();
    assert!(out_of_order(CommandListState::Closed, CommandListState::Open)(&err));
    assert_eq!(rotation.degrees(), 0.0);

    commands.record_bundle(geometry.view())?;
    let err = commands.record_bundle(geometry.view()).unwrap_err();
    assert!(out_of_order(CommandListState::Open, CommandListState::Closed)(&err));

    // --- One frame ---
    commands.populate(&allocators, &targets, &mut rotation)?;
    assert_eq!(commands.list_state(), CommandListState::Closed);
    assert_eq!(rotation.degrees(), 1.0);

    commands.submit(&queue)?;
    let err = commands.submit(&queue).unwrap_err();
    assert!(out_of_order(CommandListState::Closed, CommandListState::Submitted)(&err));

    // --- The allocator cannot be reset under the GPU ---
    let err = commands
        .populate(&allocators, &targets, &mut rotation)
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::RecordingFailed(ApiError::InvalidCall(_))
    ));
    assert_eq!(inspector.validation_messages().len(), 1);

    fence.signal_and_wait(&queue)?;
    commands.populate(&allocators, &targets, &mut rotation)?;
    commands.submit(&queue)?;
    fence.signal_and_wait(&queue)?;
    assert!(fence.is_idle());
    assert_eq!(inspector.draws(), 2);
    Ok(())
}
