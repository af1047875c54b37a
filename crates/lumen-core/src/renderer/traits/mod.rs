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

//! Defines the contracts every explicit graphics backend implements.
//!
//! The render protocol in `lumen-render` is generic over one [`Api`], which names a
//! concrete type for every object kind. Objects are released when dropped, so the
//! order in which their owners declare them is the order they are released in.
//!
//! - [`Api`], [`Factory`], [`Adapter`]: entry point and adapter enumeration.
//! - [`Device`]: capability queries and object creation.
//! - [`CommandQueue`], [`CommandAllocator`], [`GraphicsCommandList`]: recording and
//!   submission.
//! - [`SwapChain`], [`DescriptorHeap`]: presentation and render-target views.
//! - [`Resource`]: buffers and back buffers.
//! - [`Fence`], [`Event`]: CPU/GPU synchronization.

mod api;
mod command;
mod device;
mod presentation;
mod resource;
mod sync;

pub use self::api::{Adapter, Api, Factory};
pub use self::command::{CommandAllocator, CommandQueue, GraphicsCommandList};
pub use self::device::Device;
pub use self::presentation::{DescriptorHeap, SwapChain};
pub use self::resource::Resource;
pub use self::sync::{Event, Fence};
