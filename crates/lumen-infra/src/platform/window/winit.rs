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

//! The native window, through `winit`.

use lumen_core::platform::window::RenderWindow;
use raw_window_handle::{HandleError, HasWindowHandle, RawWindowHandle};
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    error::OsError,
    event_loop::ActiveEventLoop,
    window::{Window, WindowButtons, WindowId},
};

/// Title of the demo window.
pub const WINDOW_TITLE: &str = "Lumen Basic Rendering";

/// A fixed-size `winit` window the swap chain presents into.
///
/// Cloning shares the same native window.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<Window>,
}

impl WinitWindow {
    /// The `winit` identifier, to match incoming window events.
    pub fn id(&self) -> WindowId {
        self.inner.id()
    }
}

/// Creates [`WinitWindow`]s whose client area is exactly the requested size.
///
/// Resizing is disabled and only the close button is shown.
pub struct WinitWindowBuilder {
    client_size: PhysicalSize<u32>,
}

impl WinitWindowBuilder {
    /// A builder for a 640x640 client area.
    pub fn new() -> Self {
        Self {
            client_size: PhysicalSize::new(640, 640),
        }
    }

    /// Sets the client area in physical pixels.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.client_size = PhysicalSize::new(width, height);
        self
    }

    /// Opens the window on `event_loop`.
    ///
    /// # Errors
    /// Returns an `OsError` if the platform refuses to create the window.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(self.client_size)
            .with_resizable(false)
            .with_enabled_buttons(WindowButtons::CLOSE);
        let window = event_loop.create_window(attributes)?;

        let granted = window.inner_size();
        if granted != self.client_size {
            log::warn!(
                "Requested a {}x{} client area, the platform gave {}x{}",
                self.client_size.width,
                self.client_size.height,
                granted.width,
                granted.height
            );
        }
        log::info!(
            "Opened {}x{} window {:?}",
            granted.width,
            granted.height,
            window.id()
        );
        Ok(WinitWindow {
            inner: Arc::new(window),
        })
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderWindow for WinitWindow {
    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn raw_window_handle(&self) -> Result<RawWindowHandle, HandleError> {
        Ok(self.inner.window_handle()?.as_raw())
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }
}
