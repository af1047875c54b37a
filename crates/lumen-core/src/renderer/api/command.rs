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

//! Command queues, command lists and the commands recorded into them.

use std::fmt;

/// The kind of a command list, and of the allocator backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandListType {
    /// A list the queue executes directly.
    Direct,
    /// A restricted list replayed inside a direct list.
    Bundle,
}

impl fmt::Display for CommandListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandListType::Direct => f.write_str("direct"),
            CommandListType::Bundle => f.write_str("bundle"),
        }
    }
}

/// Describes the command queue to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandQueueDescriptor {
    /// The kind of lists the queue accepts. Only `Direct` queues exist.
    pub kind: CommandListType,
    /// Scheduling priority; 0 is normal.
    pub priority: i32,
    /// GPU node mask; 0 for single-adapter setups.
    pub node_mask: u32,
}

impl Default for CommandQueueDescriptor {
    fn default() -> Self {
        Self {
            kind: CommandListType::Direct,
            priority: 0,
            node_mask: 0,
        }
    }
}

/// Where a command list is in its lifecycle.
///
/// `Open -> Closed -> Submitted -> (allocator reset) -> Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandListState {
    /// Accepting commands.
    Open,
    /// Recording finished; eligible for submission.
    Closed,
    /// Handed to the queue; must be reset before recording again.
    Submitted,
}

impl fmt::Display for CommandListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandListState::Open => f.write_str("open"),
            CommandListState::Closed => f.write_str("closed"),
            CommandListState::Submitted => f.write_str("submitted"),
        }
    }
}

/// The usage state of a resource, changed by transition barriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Ready to be presented. Also the common state.
    Present,
    /// Bound as a color render target.
    RenderTarget,
    /// Readable by any GPU stage; the required state of upload heap buffers.
    GenericRead,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Present => f.write_str("PRESENT"),
            ResourceState::RenderTarget => f.write_str("RENDER_TARGET"),
            ResourceState::GenericRead => f.write_str("GENERIC_READ"),
        }
    }
}

/// A transition barrier on all subresources of `resource`.
#[derive(Debug, Clone, Copy)]
pub struct TransitionBarrier<'a, R> {
    /// The resource being transitioned.
    pub resource: &'a R,
    /// The state the resource is in.
    pub before: ResourceState,
    /// The state the resource moves to.
    pub after: ResourceState,
}

impl<'a, R> TransitionBarrier<'a, R> {
    /// A transition of `resource` from `before` to `after`.
    pub fn new(resource: &'a R, before: ResourceState, after: ResourceState) -> Self {
        Self {
            resource,
            before,
            after,
        }
    }
}

/// A rasterizer viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near depth.
    pub min_depth: f32,
    /// Far depth.
    pub max_depth: f32,
}

impl Viewport {
    /// Covers the whole `width` x `height` target with the 0..1 depth range.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A scissor rectangle, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ScissorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScissorRect {
    /// Covers the whole `width` x `height` target.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

/// How the input assembler interprets the bound vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Independent triangles.
    TriangleList,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
}

/// A view of a vertex buffer for the input assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferView {
    /// GPU virtual address of the first vertex.
    pub buffer_location: u64,
    /// Size of the view in bytes.
    pub size_in_bytes: u32,
    /// Distance between consecutive vertices in bytes.
    pub stride_in_bytes: u32,
}

impl VertexBufferView {
    /// Number of whole vertices the view covers.
    pub fn vertex_count(&self) -> u32 {
        if self.stride_in_bytes == 0 {
            0
        } else {
            self.size_in_bytes / self.stride_in_bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_and_scissor_cover_the_target() {
        let vp = Viewport::full(640, 480);
        assert_eq!((vp.width, vp.height), (640.0, 480.0));
        assert_eq!((vp.min_depth, vp.max_depth), (0.0, 1.0));

        let rect = ScissorRect::full(640, 480);
        assert_eq!(
            rect,
            ScissorRect {
                left: 0,
                top: 0,
                right: 640,
                bottom: 480
            }
        );
    }

    #[test]
    fn vertex_buffer_view_counts_vertices() {
        let view = VertexBufferView {
            buffer_location: 0x1000,
            size_in_bytes: 128,
            stride_in_bytes: 32,
        };
        assert_eq!(view.vertex_count(), 4);
    }
}
