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

use raw_window_handle::{HandleError, RawWindowHandle};

/// A trait that abstracts the behavior of a window the renderer can present into.
///
/// Any windowing backend (Winit, a headless stand-in, etc.) can implement this trait
/// to be compatible with the render protocol.
pub trait RenderWindow {
    /// Returns the physical dimensions (width, height) of the window's client area.
    fn inner_size(&self) -> (u32, u32);

    /// Returns the raw native handle the swap chain is created against.
    fn raw_window_handle(&self) -> Result<RawWindowHandle, HandleError>;

    /// Requests that the window be redrawn.
    fn request_redraw(&self);
}
