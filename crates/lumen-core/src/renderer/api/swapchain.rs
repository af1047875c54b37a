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

//! Swap chain and texture formats.

/// Pixel formats used by render targets and vertex attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// Four 8-bit unsigned normalized channels.
    #[default]
    Rgba8Unorm,
    /// Four 32-bit float channels.
    Rgba32Float,
}

impl TextureFormat {
    /// Size of one element in bytes.
    pub const fn bytes_per_element(self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

/// How presented buffers are handed to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapEffect {
    /// Buffers are presented in order and kept after present.
    #[default]
    FlipSequential,
    /// Buffers are presented in order and discarded after present.
    FlipDiscard,
}

/// Describes the swap chain bound to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDescriptor {
    /// Back-buffer width in pixels.
    pub width: u32,
    /// Back-buffer height in pixels.
    pub height: u32,
    /// Back-buffer format.
    pub format: TextureFormat,
    /// Number of back buffers in rotation.
    pub buffer_count: u32,
    /// Refresh rate as numerator / denominator.
    pub refresh_rate: (u32, u32),
    /// Presentation model.
    pub swap_effect: SwapEffect,
    /// Windowed rather than exclusive fullscreen.
    pub windowed: bool,
}

impl SwapChainDescriptor {
    /// A windowed, flip-sequential, 60 Hz swap chain of `buffer_count` RGBA8 buffers.
    pub fn windowed(width: u32, height: u32, buffer_count: u32) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::Rgba8Unorm,
            buffer_count,
            refresh_rate: (60, 1),
            swap_effect: SwapEffect::FlipSequential,
            windowed: true,
        }
    }
}
