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

use lumen_core::platform::window::RenderWindow;
use raw_window_handle::{HandleError, RawWindowHandle, WebWindowHandle};
use std::cell::Cell;

/// A window that does not exist on screen, for the headless backend.
///
/// Its handle is a placeholder that only the headless factory accepts.
#[derive(Debug)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    redraw_requests: Cell<u64>,
}

impl HeadlessWindow {
    /// A window with a `width` x `height` client area.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            redraw_requests: Cell::new(0),
        }
    }

    /// How many redraws were requested.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests.get()
    }
}

impl RenderWindow for HeadlessWindow {
    fn inner_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn raw_window_handle(&self) -> Result<RawWindowHandle, HandleError> {
        Ok(RawWindowHandle::Web(WebWindowHandle::new(1)))
    }

    fn request_redraw(&self) {
        self.redraw_requests.set(self.redraw_requests.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_its_size_and_counts_redraws() {
        let window = HeadlessWindow::new(640, 480);
        assert_eq!(window.inner_size(), (640, 480));
        assert!(window.raw_window_handle().is_ok());
        window.request_redraw();
        window.request_redraw();
        assert_eq!(window.redraw_requests(), 2);
    }
}
