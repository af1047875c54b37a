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

//! The windowed event loop and the headless runner.

use anyhow::{bail, Context, Result};
use lumen_core::platform::RenderWindow;
use lumen_core::renderer::{AdapterSelector, Api, FixedAdapter, RenderConfig, ShaderSource};
use lumen_infra::graphics::headless::{Headless, HeadlessFactory};
use lumen_infra::platform::input::{translate_key_down, KeyCommand};
use lumen_infra::platform::window::{HeadlessWindow, WinitWindow, WinitWindowBuilder};
use lumen_infra::{CsoShaderSource, PromptAdapterSelector};
use lumen_render::{FrameStats, RenderContext};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

#[cfg(windows)]
mod backend {
    use anyhow::{Context, Result};
    use lumen_core::renderer::RenderConfig;
    use lumen_infra::graphics::d3d12::{D3D12Factory, D3D12};

    pub type Backend = D3D12;

    pub fn create_factory(config: &RenderConfig) -> Result<D3D12Factory> {
        D3D12Factory::new(config.enable_debug_layer).context("failed to create the DXGI factory")
    }
}

#[cfg(not(windows))]
mod backend {
    use anyhow::Result;
    use lumen_core::renderer::RenderConfig;
    use lumen_infra::graphics::headless::{Headless, HeadlessFactory};

    pub type Backend = Headless;

    pub fn create_factory(_config: &RenderConfig) -> Result<HeadlessFactory> {
        log::warn!("Direct3D 12 is only available on Windows; rendering headless behind the window");
        Ok(HeadlessFactory::default())
    }
}

use self::backend::Backend;

/// The configured adapter, or the console prompt when none is configured.
fn adapter_selector(config: &RenderConfig) -> Box<dyn AdapterSelector> {
    match config.adapter_index {
        Some(index) => Box::new(FixedAdapter(index)),
        None => Box::new(PromptAdapterSelector::stdio()),
    }
}

/// Opens the window and renders until it is closed.
pub fn run_windowed(config: RenderConfig, shaders: CsoShaderSource) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BasicRenderingApp::new(config, shaders);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;
    app.finish()
}

/// Renders one frame. A failed frame is logged and the caller keeps going: only
/// setup failures end the process with an error.
fn render_logged<A: Api>(context: &mut RenderContext<A>) -> Option<FrameStats> {
    match context.render_frame() {
        Ok(stats) => Some(stats),
        Err(e) => {
            log::error!("Frame {} failed: {e}", context.frame_number() + 1);
            None
        }
    }
}

/// Renders `frames` frames without a window and checks the headless backend's
/// bookkeeping afterwards.
pub fn run_headless(config: &RenderConfig, shaders: &CsoShaderSource, frames: u64) -> Result<()> {
    render_headless(HeadlessFactory::default(), config, shaders, frames)
}

fn render_headless(
    factory: HeadlessFactory,
    config: &RenderConfig,
    shaders: &dyn ShaderSource,
    frames: u64,
) -> Result<()> {
    let inspector = factory.inspector();
    let window = HeadlessWindow::new(config.width, config.height);
    let mut selector = adapter_selector(config);

    let mut context = RenderContext::<Headless>::new(
        factory,
        &window,
        config,
        selector.as_mut(),
        shaders,
    )
    .context("render setup failed")?;
    let mut failed = 0u64;
    // The setup frame counts towards `frames`.
    for _ in 1..frames {
        match render_logged(&mut context) {
            Some(stats) => log::debug!(
                "Frame {} at {:.0} degrees",
                stats.frame_number,
                stats.rotation_degrees()
            ),
            None => failed += 1,
        }
    }
    if failed > 0 {
        log::warn!("{failed} frame(s) failed");
    }
    let rendered = context.frame_number();
    context.shutdown()?;

    log::info!(
        "Rendered {} frame(s) headless: {} present(s), {} draw(s)",
        rendered,
        inspector.presents(),
        inspector.draws()
    );
    let messages = inspector.validation_messages();
    if !messages.is_empty() {
        bail!(
            "{} validation message(s), first: {}",
            messages.len(),
            messages[0]
        );
    }
    let live = inspector.live_objects();
    if !live.is_empty() {
        bail!("{} object(s) leaked: {:?}", live.len(), live);
    }
    Ok(())
}

/// Owns the window and the render context for the lifetime of the event loop.
struct BasicRenderingApp {
    // Released before the window it presents to.
    context: Option<RenderContext<Backend>>,
    window: Option<WinitWindow>,
    config: RenderConfig,
    shaders: CsoShaderSource,
    failure: Option<anyhow::Error>,
}

impl BasicRenderingApp {
    fn new(config: RenderConfig, shaders: CsoShaderSource) -> Self {
        Self {
            context: None,
            window: None,
            config,
            shaders,
            failure: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = WinitWindowBuilder::new()
            .with_dimensions(self.config.width, self.config.height)
            .build(event_loop)
            .context("failed to create the window")?;
        let factory = backend::create_factory(&self.config)?;
        let mut selector = adapter_selector(&self.config);
        let context = RenderContext::<Backend>::new(
            factory,
            &window,
            &self.config,
            selector.as_mut(),
            &self.shaders,
        )
        .context("render setup failed")?;

        self.window = Some(window);
        self.context = Some(context);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure.get_or_insert(error);
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if let Some(context) = self.context.take() {
            log::info!("Shutting down after {} frame(s)", context.frame_number());
            if let Err(e) = context.shutdown() {
                log::error!("GPU did not go idle before teardown: {e}");
            }
        }
    }

    fn finish(mut self) -> Result<()> {
        self.shutdown();
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for BasicRenderingApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        log::info!("Application resumed. Initializing window and renderer...");
        if let Err(e) = self.setup(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(WinitWindow::id) != Some(id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(context) = self.context.as_mut() else {
                    return;
                };
                if let Some(stats) = render_logged(context) {
                    log::trace!("Frame {} rendered.", stats.frame_number);
                }
            }
            ref other => match translate_key_down(other) {
                Some(KeyCommand::Exit) => {
                    log::info!("Escape pressed, exiting event loop...");
                    event_loop.exit();
                }
                Some(command) => log::debug!("{command:?} has no action"),
                None => {}
            },
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::InMemoryShaderSource;
    use lumen_core::{ApiError, RenderError};
    use lumen_infra::graphics::headless::{Call, FaultPlan, HeadlessConfig};

    fn config() -> RenderConfig {
        RenderConfig {
            adapter_index: Some(0),
            ..RenderConfig::default()
        }
    }

    fn shaders() -> InMemoryShaderSource {
        InMemoryShaderSource::new(b"DXBC-vertex".to_vec(), b"DXBC-pixel".to_vec())
    }

    #[test]
    fn a_failed_frame_is_logged_and_rendering_continues() -> Result<()> {
        // The first present belongs to setup.
        let faults = FaultPlan::none().and_fail_nth(
            Call::Present,
            2,
            ApiError::DeviceRemoved("hung".into()),
        );
        let factory = HeadlessFactory::with_faults(HeadlessConfig::default(), faults);
        let inspector = factory.inspector();

        render_headless(factory, &config(), &shaders(), 4)?;

        assert_eq!(inspector.call_count(Call::Present), 4);
        assert!(inspector.live_objects().is_empty());
        Ok(())
    }

    #[test]
    fn render_logged_returns_none_for_a_failed_frame() -> Result<()> {
        let faults =
            FaultPlan::none().and_fail_nth(Call::ExecuteCommandLists, 2, ApiError::OutOfMemory);
        let factory = HeadlessFactory::with_faults(HeadlessConfig::default(), faults);
        let window = HeadlessWindow::new(640, 640);
        let mut context = RenderContext::<Headless>::new(
            factory,
            &window,
            &config(),
            &mut FixedAdapter(0),
            &shaders(),
        )?;

        assert!(render_logged(&mut context).is_none());
        let stats = render_logged(&mut context).expect("the next frame renders");
        assert_eq!(stats.frame_number, 2);
        context.shutdown()?;
        Ok(())
    }

    #[test]
    fn a_setup_failure_still_fails_the_run() {
        let faults = FaultPlan::fail(Call::CreateDevice, ApiError::OutOfMemory);
        let factory = HeadlessFactory::with_faults(HeadlessConfig::default(), faults);

        let err = render_headless(factory, &config(), &shaders(), 3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::DeviceCreationFailed { .. })
        ));
    }
}
