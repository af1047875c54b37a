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

//! [`RenderContext`]: the single owner of every GPU object.
//!
//! Setup runs in a fixed order of stages. Teardown, both after a failed stage and
//! at shutdown, releases objects in reverse dependency order: event, fence, vertex
//! buffer, bundle and command list, pipeline state, root signature, render
//! targets, descriptor heap, swap chain, queue, allocators, device, factory.

use crate::device_context::DeviceContext;
use crate::frame_resources::FrameResources;
use crate::geometry::QuadGeometry;
use crate::pipeline::PipelineLayer;
use crate::rotation::RotationAngle;
use crate::submission::{CommandAllocators, CommandEngine, FrameTargets};
use crate::sync::FrameFence;
use lumen_core::platform::RenderWindow;
use lumen_core::renderer::{
    AdapterSelector, Api, CommandQueueDescriptor, Device, RenderConfig, RenderError,
    ShaderSource,
};

/// What one call to [`RenderContext::render_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered so far, this one included.
    pub frame_number: u64,
    /// Fence value the frame waited for.
    pub fence_value: u64,
    /// Back buffer the frame rendered into.
    pub back_buffer_index: u32,
    /// Bit pattern of the rotation angle pushed as the root constant.
    pub rotation_bits: u32,
    /// Back buffer the next frame will render into.
    pub next_back_buffer_index: u32,
}

impl FrameStats {
    /// The rotation pushed this frame, in degrees.
    pub fn rotation_degrees(&self) -> f32 {
        f32::from_bits(self.rotation_bits)
    }
}

/// Owns the device and everything created from it, and drives the per-frame
/// protocol.
///
/// Fields are declared in release order.
pub struct RenderContext<A: Api> {
    sync: FrameFence<A>,
    geometry: QuadGeometry<A>,
    commands: CommandEngine<A>,
    pipeline: PipelineLayer<A>,
    frames: FrameResources<A>,
    queue: A::CommandQueue,
    allocators: CommandAllocators<A>,
    device: DeviceContext<A>,
    factory: A::Factory,

    rotation: RotationAngle,
    clear_color: [f32; 4],
    sync_interval: u32,
    frame_number: u64,
}

impl<A: Api> RenderContext<A> {
    /// Runs every setup stage and renders the first frame.
    ///
    /// Stages: device on the selected adapter and capability report, allocators
    /// and queue, swap chain, render-target views, root signature, pipeline state
    /// and command lists, vertex buffer and bundle, fence and event, initial wait.
    /// When a stage fails, the objects created so far are released in teardown
    /// order and the stage's error is returned.
    pub fn new(
        factory: A::Factory,
        window: &dyn RenderWindow,
        config: &RenderConfig,
        selector: &mut dyn AdapterSelector,
        shaders: &dyn ShaderSource,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        let window_handle = window
            .raw_window_handle()
            .map_err(|e| RenderError::InvalidWindow(e.to_string()))?;

        // Objects are created in the reverse of teardown order. A failing stage,
        // or a failure inside one, then drops only later-ranked objects before the
        // locals already bound here, which drop in reverse declaration order.
        let mut device = DeviceContext::<A>::initialize(&factory, selector)?;
        device.query_capabilities()?;

        let allocators = CommandAllocators::<A>::new(device.device())?;
        let queue = device
            .device()
            .create_command_queue(&CommandQueueDescriptor::default())
            .map_err(RenderError::CommandQueueCreationFailed)?;

        let mut frames = FrameResources::<A>::new(
            &factory,
            device.device(),
            &queue,
            window_handle,
            config.width,
            config.height,
            config.frame_count,
        )?;

        let root_signature = PipelineLayer::<A>::create_root_signature(device.device())?;
        let pipeline_state =
            PipelineLayer::<A>::create_pipeline_state(device.device(), &root_signature, shaders)?;
        let mut commands = CommandEngine::new(device.device(), &allocators, &pipeline_state)?;

        let geometry = QuadGeometry::create_and_upload(device.device())?;
        commands.record_bundle(geometry.view())?;

        let mut sync = FrameFence::new(device.device())?;
        sync.signal_and_wait(&queue)?;

        let pipeline = PipelineLayer::from_parts(root_signature, pipeline_state);
        frames.refresh_back_buffer_index();

        log::info!(
            "Render context ready on {} ({} back buffers, {}x{})",
            A::NAME,
            config.frame_count,
            config.width,
            config.height
        );

        let mut context = Self {
            sync,
            geometry,
            commands,
            pipeline,
            frames,
            queue,
            allocators,
            device,
            factory,
            rotation: RotationAngle::new(config.rotation_step_degrees),
            clear_color: config.clear_color,
            sync_interval: config.sync_interval,
            frame_number: 0,
        };
        context.render_frame()?;
        Ok(context)
    }

    /// Records, submits and presents one frame, then waits until the GPU has
    /// finished it.
    pub fn render_frame(&mut self) -> Result<FrameStats, RenderError> {
        let back_buffer_index = self.frames.back_buffer_index();
        let (back_buffer, rtv) = self.frames.current_target()?;
        let targets = FrameTargets {
            pipeline_state: self.pipeline.pipeline_state(),
            root_signature: self.pipeline.root_signature(),
            back_buffer,
            rtv,
            viewport: self.frames.viewport(),
            scissor: self.frames.scissor_rect(),
            clear_color: self.clear_color,
        };
        let rotation_bits = self
            .commands
            .populate(&self.allocators, &targets, &mut self.rotation)?;

        self.commands.submit(&self.queue)?;
        self.sync.mark_submitted();
        let presented = self.frames.present(self.sync_interval);
        // Submitted work is waited for even when present fails, so the direct
        // allocator is never reset under the GPU.
        let fence_value = self.sync.signal_and_wait(&self.queue)?;
        presented?;
        let next_back_buffer_index = self.frames.refresh_back_buffer_index();

        self.frame_number += 1;
        log::trace!(
            "Frame {} rendered into back buffer {}",
            self.frame_number,
            back_buffer_index
        );
        Ok(FrameStats {
            frame_number: self.frame_number,
            fence_value,
            back_buffer_index,
            rotation_bits,
            next_back_buffer_index,
        })
    }

    /// Waits for the GPU to go idle, then releases everything in teardown order.
    pub fn shutdown(mut self) -> Result<(), RenderError> {
        if !self.sync.is_idle() {
            self.sync.signal_and_wait(&self.queue)?;
        }
        Ok(())
    }

    /// The device and its capability report.
    pub fn device_context(&self) -> &DeviceContext<A> {
        &self.device
    }

    /// The swap chain and render targets.
    pub fn frame_resources(&self) -> &FrameResources<A> {
        &self.frames
    }

    /// The frame fence.
    pub fn frame_fence(&self) -> &FrameFence<A> {
        &self.sync
    }

    /// The quad's vertex buffer.
    pub fn geometry(&self) -> &QuadGeometry<A> {
        &self.geometry
    }

    /// The command lists.
    pub fn commands(&self) -> &CommandEngine<A> {
        &self.commands
    }

    /// The current rotation.
    pub fn rotation(&self) -> RotationAngle {
        self.rotation
    }

    /// Frames rendered so far.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl<A: Api> Drop for RenderContext<A> {
    fn drop(&mut self) {
        log::info!(
            "Releasing render context after {} frame(s)",
            self.frame_number
        );
    }
}
