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

//! The static quad: four vertices in an upload heap buffer.

use bytemuck::{Pod, Zeroable};
use lumen_core::renderer::{
    Api, BufferDescriptor, Device, InputElement, RenderError, Resource, VertexBufferView,
    VertexFormat,
};
use lumen_core::ApiError;
use std::mem::size_of;

/// One vertex: homogeneous position and RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// `x, y, z, w`
    pub position: [f32; 4],
    /// `r, g, b, a`
    pub color: [f32; 4],
}

impl QuadVertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: u32 = size_of::<QuadVertex>() as u32;

    /// `POSITION` at offset 0 and `COLOR` at offset 16, both four floats.
    pub const INPUT_LAYOUT: [InputElement; 2] = [
        InputElement {
            semantic_name: "POSITION",
            semantic_index: 0,
            format: VertexFormat::Float32x4,
            input_slot: 0,
            aligned_byte_offset: 0,
        },
        InputElement {
            semantic_name: "COLOR",
            semantic_index: 0,
            format: VertexFormat::Float32x4,
            input_slot: 0,
            aligned_byte_offset: 16,
        },
    ];

    const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y, 0.0, 1.0],
            color,
        }
    }
}

/// The quad, in triangle-strip order.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex::new(-0.75, 0.75, [0.9, 0.1, 0.1, 1.0]),
    QuadVertex::new(0.75, 0.75, [0.9, 0.9, 0.1, 1.0]),
    QuadVertex::new(-0.75, -0.75, [0.1, 0.9, 0.1, 1.0]),
    QuadVertex::new(0.75, -0.75, [0.1, 0.1, 0.9, 1.0]),
];

/// The uploaded vertex buffer and the view the bundle binds.
pub struct QuadGeometry<A: Api> {
    vertex_buffer: A::Resource,
    view: VertexBufferView,
}

impl<A: Api> QuadGeometry<A> {
    /// Creates an upload buffer sized to [`QUAD_VERTICES`] and copies them in.
    ///
    /// The buffer is mapped with an empty read range since the CPU only writes it.
    pub fn create_and_upload(device: &A::Device) -> Result<Self, RenderError> {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        let vertex_buffer = device
            .create_committed_buffer(&BufferDescriptor::upload(bytes.len() as u64))
            .map_err(RenderError::VertexBufferFailed)?;
        if (vertex_buffer.size() as usize) < bytes.len() {
            return Err(RenderError::VertexBufferFailed(ApiError::InvalidArgument(
                format!(
                    "vertex buffer holds {} bytes, {} needed",
                    vertex_buffer.size(),
                    bytes.len()
                ),
            )));
        }

        // SAFETY: the mapping covers `size()` bytes, checked above to fit `bytes`,
        // and the GPU has not been given the buffer yet.
        unsafe {
            let mapped = vertex_buffer
                .map(0, Some(0..0))
                .map_err(RenderError::VertexBufferFailed)?;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapped.as_ptr(), bytes.len());
            vertex_buffer.unmap(0, None);
        }

        let view = VertexBufferView {
            buffer_location: vertex_buffer.gpu_virtual_address(),
            size_in_bytes: bytes.len() as u32,
            stride_in_bytes: QuadVertex::STRIDE,
        };
        log::debug!("Uploaded {} quad vertices", QUAD_VERTICES.len());
        Ok(Self {
            vertex_buffer,
            view,
        })
    }

    /// Maps the buffer for reading and copies the vertices back out.
    pub fn read_back(&self) -> Result<Vec<QuadVertex>, RenderError> {
        let len = self.view.size_in_bytes as usize;
        let mut bytes = vec![0u8; len];
        // SAFETY: `len` was checked against the buffer size at upload, and the
        // caller only reads back between frames, when the GPU is idle.
        unsafe {
            let mapped = self
                .vertex_buffer
                .map(0, None)
                .map_err(RenderError::VertexBufferFailed)?;
            std::ptr::copy_nonoverlapping(mapped.as_ptr(), bytes.as_mut_ptr(), len);
            self.vertex_buffer.unmap(0, Some(0..0));
        }
        Ok(bytes
            .chunks_exact(QuadVertex::STRIDE as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }

    /// The view the bundle binds.
    pub fn view(&self) -> VertexBufferView {
        self.view
    }

    /// Number of vertices in the buffer.
    pub fn vertex_count(&self) -> u32 {
        self.view.vertex_count()
    }

    /// The buffer itself.
    pub fn vertex_buffer(&self) -> &A::Resource {
        &self.vertex_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_the_input_layout() {
        assert_eq!(QuadVertex::STRIDE, 32);
        assert_eq!(size_of::<[QuadVertex; 4]>(), 128);
        let color = QuadVertex::INPUT_LAYOUT[1];
        assert_eq!(color.aligned_byte_offset, color.format.size());
    }

    #[test]
    fn quad_corners() {
        let positions: Vec<[f32; 2]> = QUAD_VERTICES
            .iter()
            .map(|v| [v.position[0], v.position[1]])
            .collect();
        assert_eq!(
            positions,
            vec![[-0.75, 0.75], [0.75, 0.75], [-0.75, -0.75], [0.75, -0.75]]
        );
        assert!(QUAD_VERTICES.iter().all(|v| v.position[2] == 0.0 && v.position[3] == 1.0));
    }
}
