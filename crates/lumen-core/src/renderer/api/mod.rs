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

//! Backend-agnostic value types of the explicit graphics API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`adapter`]**: physical adapter descriptions and adapter selection.
//! - **[`capabilities`]**: results of the informational device capability queries.
//! - **[`command`]**: queues, command lists, barriers and fixed-function commands.
//! - **[`descriptor`]**: descriptor heaps and CPU descriptor handles.
//! - **[`pipeline`]**: root signatures and graphics pipeline state.
//! - **[`resource`]**: committed buffer descriptions.
//! - **[`shader`]**: opaque compiled shader bytecode and its sources.
//! - **[`swapchain`]**: swap chain and texture formats.
//! - **[`settings`]**: the render configuration.

pub mod adapter;
pub mod capabilities;
pub mod command;
pub mod descriptor;
pub mod pipeline;
pub mod resource;
pub mod settings;
pub mod shader;
pub mod swapchain;

pub use self::adapter::*;
pub use self::capabilities::*;
pub use self::command::*;
pub use self::descriptor::*;
pub use self::pipeline::*;
pub use self::resource::*;
pub use self::settings::*;
pub use self::shader::*;
pub use self::swapchain::*;
