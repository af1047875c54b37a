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

//! # Lumen Render
//!
//! The resource lifecycle and per-frame submission protocol of the basic rendering
//! demo, written once against the [`lumen_core::renderer::Api`] contracts and run on
//! any backend that implements them.
//!
//! - [`device_context`]: adapter enumeration and selection, device creation and the
//!   capability report.
//! - [`frame_resources`]: the swap chain and its render-target views.
//! - [`sync`]: the frame fence and the stall-until-idle wait.
//! - [`pipeline`]: the root signature and the pipeline state object.
//! - [`submission`]: allocators, the direct command list and the bundle.
//! - [`geometry`]: the uploaded quad.
//! - [`rotation`]: the rotating root constant.
//! - [`context`]: [`RenderContext`], the single owner of every object above.

#![warn(missing_docs)]

pub mod context;
pub mod device_context;
pub mod frame_resources;
pub mod geometry;
pub mod pipeline;
pub mod rotation;
pub mod submission;
pub mod sync;

pub use context::{FrameStats, RenderContext};
pub use device_context::{resolve_adapter_index, DeviceContext};
pub use frame_resources::FrameResources;
pub use geometry::{QuadGeometry, QuadVertex, QUAD_VERTICES};
pub use pipeline::PipelineLayer;
pub use rotation::RotationAngle;
pub use submission::{CommandAllocators, CommandEngine, FrameTargets};
pub use sync::FrameFence;
