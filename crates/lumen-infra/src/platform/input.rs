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

//! Provides translation from the `winit` keyboard events to the demo's key commands.
//!
//! The demo reacts to a handful of keys; everything else is dropped here so the
//! event loop only matches on [`KeyCommand`].

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A key the demo recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    /// Escape: request shutdown.
    Exit,
    /// Left arrow. Recognized, no bound behavior.
    Left,
    /// Right arrow. Recognized, no bound behavior.
    Right,
    /// Space bar. Recognized, no bound behavior.
    Space,
}

impl KeyCommand {
    /// Maps a physical key to a command.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Escape => Some(KeyCommand::Exit),
            KeyCode::ArrowLeft => Some(KeyCommand::Left),
            KeyCode::ArrowRight => Some(KeyCommand::Right),
            KeyCode::Space => Some(KeyCommand::Space),
            _ => None,
        }
    }
}

/// Translates a key-down `WindowEvent` into a [`KeyCommand`].
///
/// Releases, auto-repeats and unmapped keys yield `None`.
pub fn translate_key_down(event: &WindowEvent) -> Option<KeyCommand> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } if key_event.state == ElementState::Pressed && !key_event.repeat => {
            match key_event.physical_key {
                PhysicalKey::Code(code) => KeyCommand::from_key_code(code),
                PhysicalKey::Unidentified(_) => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_demo_keys_are_mapped() {
        assert_eq!(KeyCommand::from_key_code(KeyCode::Escape), Some(KeyCommand::Exit));
        assert_eq!(KeyCommand::from_key_code(KeyCode::ArrowLeft), Some(KeyCommand::Left));
        assert_eq!(KeyCommand::from_key_code(KeyCode::ArrowRight), Some(KeyCommand::Right));
        assert_eq!(KeyCommand::from_key_code(KeyCode::Space), Some(KeyCommand::Space));
        assert_eq!(KeyCommand::from_key_code(KeyCode::KeyW), None);
    }

    #[test]
    fn non_keyboard_events_are_ignored() {
        assert_eq!(translate_key_down(&WindowEvent::CloseRequested), None);
        assert_eq!(translate_key_down(&WindowEvent::RedrawRequested), None);
    }
}
