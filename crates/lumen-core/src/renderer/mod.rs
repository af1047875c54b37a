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

//! Provides the public, backend-agnostic contracts of the explicit graphics API.
//!
//! This module defines the "common language" of the renderer. It contains the
//! abstract `traits` (like [`Device`] and [`GraphicsCommandList`]), the descriptor
//! and value types (like [`SwapChainDescriptor`]), and the error types.
//!
//! The 'what' lives here, while the 'how' is handled by a concrete backend in the
//! `lumen-infra` crate (Direct3D 12 or the headless validator) implementing these
//! traits. `lumen-render` drives the frame protocol purely through them.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{ApiError, RenderError};
pub use self::traits::{
    Adapter, Api, CommandAllocator, CommandQueue, DescriptorHeap, Device, Event, Factory, Fence,
    GraphicsCommandList, Resource, SwapChain,
};
