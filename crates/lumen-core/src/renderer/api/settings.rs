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

//! The render configuration.

use crate::renderer::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The lowest accepted back-buffer count.
pub const MIN_FRAME_COUNT: u32 = 2;
/// The highest accepted back-buffer count.
pub const MAX_FRAME_COUNT: u32 = 16;

/// Settings of the basic rendering demo. Every field has a default, so a partial
/// config file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Client area width in pixels.
    pub width: u32,
    /// Client area height in pixels.
    pub height: u32,
    /// Number of swap-chain back buffers.
    pub frame_count: u32,
    /// RGBA color the render target is cleared to every frame.
    pub clear_color: [f32; 4],
    /// Degrees the quad rotates per rendered frame.
    pub rotation_step_degrees: f32,
    /// Present sync interval; 1 locks presentation to vertical blank.
    pub sync_interval: u32,
    /// Path of the compiled vertex shader object.
    pub vertex_shader: PathBuf,
    /// Path of the compiled pixel shader object.
    pub pixel_shader: PathBuf,
    /// Enable the platform debug layer, when one is available.
    pub enable_debug_layer: bool,
    /// Adapter to use. When unset the user is asked.
    pub adapter_index: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            frame_count: 5,
            clear_color: [0.5, 0.6, 0.5, 1.0],
            rotation_step_degrees: 1.0,
            sync_interval: 1,
            vertex_shader: PathBuf::from("shaders/basic.vert.cso"),
            pixel_shader: PathBuf::from("shaders/basic.frag.cso"),
            enable_debug_layer: cfg!(debug_assertions),
            adapter_index: None,
        }
    }
}

impl RenderConfig {
    /// Checks that the configuration can drive the render protocol.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "client area must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(MIN_FRAME_COUNT..=MAX_FRAME_COUNT).contains(&self.frame_count) {
            return Err(RenderError::InvalidConfiguration(format!(
                "frame_count must be within {MIN_FRAME_COUNT}..={MAX_FRAME_COUNT}, got {}",
                self.frame_count
            )));
        }
        let step = self.rotation_step_degrees;
        if !step.is_finite() || step <= 0.0 || step >= 360.0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "rotation_step_degrees must be within (0, 360), got {step}"
            )));
        }
        if self.sync_interval > 4 {
            return Err(RenderError::InvalidConfiguration(format!(
                "sync_interval must be within 0..=4, got {}",
                self.sync_interval
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (640, 640));
        assert_eq!(config.frame_count, 5);
        assert_eq!(config.clear_color, [0.5, 0.6, 0.5, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config: RenderConfig = ron::from_str("(frame_count: 3, adapter_index: Some(1))").unwrap();
        assert_eq!(config.frame_count, 3);
        assert_eq!(config.adapter_index, Some(1));
        assert_eq!(config.width, 640);
        assert_eq!(config.vertex_shader, PathBuf::from("shaders/basic.vert.cso"));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let too_few = RenderConfig {
            frame_count: 1,
            ..Default::default()
        };
        assert!(matches!(
            too_few.validate(),
            Err(RenderError::InvalidConfiguration(_))
        ));

        let no_rotation = RenderConfig {
            rotation_step_degrees: 0.0,
            ..Default::default()
        };
        assert!(no_rotation.validate().is_err());

        let full_turn = RenderConfig {
            rotation_step_degrees: 360.0,
            ..Default::default()
        };
        assert!(full_turn.validate().is_err());

        let empty = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }
}
