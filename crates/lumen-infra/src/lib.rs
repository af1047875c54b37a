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

//! Concrete implementations behind the `lumen-core` contracts.
//!
//! - [`graphics`]: the Direct3D 12 backend (Windows only) and an in-process headless
//!   backend that records and validates everything submitted to it.
//! - [`platform`]: the native window and keyboard translation, plus a headless
//!   window for tests.
//! - [`assets`], [`config`] and [`prompt`]: compiled shader files, the RON
//!   configuration and the console adapter prompt.

pub mod assets;
pub mod config;
pub mod graphics;
pub mod platform;
pub mod prompt;

pub use self::assets::CsoShaderSource;
pub use self::config::load_render_config;
pub use self::graphics::headless::{Headless, HeadlessConfig, HeadlessFactory, HeadlessInspector};
pub use self::prompt::PromptAdapterSelector;
