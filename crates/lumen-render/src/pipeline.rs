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

//! The root signature and the graphics pipeline state object.

use crate::geometry::QuadVertex;
use lumen_core::renderer::{
    Api, DepthStencilState, Device, GraphicsPipelineDescriptor, PrimitiveTopologyType,
    RasterizerState, RenderError, RenderTargetBlend, RootSignatureDescriptor, SampleDesc,
    ShaderBytecode, ShaderSource, ShaderStage, TextureFormat,
};

/// Format of the single render target.
pub const RENDER_TARGET_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// The root signature and the pipeline state baked against it.
///
/// The pipeline state is released before the root signature.
pub struct PipelineLayer<A: Api> {
    pipeline_state: A::PipelineState,
    root_signature: A::RootSignature,
}

impl<A: Api> PipelineLayer<A> {
    /// Creates the root signature: one vertex-visible 32-bit constant.
    pub fn create_root_signature(device: &A::Device) -> Result<A::RootSignature, RenderError> {
        device
            .create_root_signature(&RootSignatureDescriptor::single_vertex_constant())
            .map_err(RenderError::RootSignatureCreationFailed)
    }

    /// Loads both shader stages from `shaders`. Runs before any pipeline object is
    /// created so a bad shader file aborts early.
    pub fn load_shaders(
        shaders: &dyn ShaderSource,
    ) -> Result<(ShaderBytecode, ShaderBytecode), RenderError> {
        let vertex = shaders.load(ShaderStage::Vertex)?;
        let pixel = shaders.load(ShaderStage::Pixel)?;
        log::debug!(
            "Loaded shaders: {} byte vertex, {} byte pixel",
            vertex.len(),
            pixel.len()
        );
        Ok((vertex, pixel))
    }

    /// The fixed pipeline description: quad input layout, alpha blending, back-face
    /// culling, no depth/stencil, triangles, one RGBA8 target, no multisampling.
    pub fn pipeline_descriptor<'a>(
        root_signature: &'a A::RootSignature,
        vertex_shader: &'a ShaderBytecode,
        pixel_shader: &'a ShaderBytecode,
    ) -> GraphicsPipelineDescriptor<'a, A::RootSignature> {
        GraphicsPipelineDescriptor {
            root_signature,
            vertex_shader,
            pixel_shader,
            input_layout: &QuadVertex::INPUT_LAYOUT,
            blend: RenderTargetBlend::alpha_blending(),
            rasterizer: RasterizerState::default(),
            depth_stencil: DepthStencilState::default(),
            topology_type: PrimitiveTopologyType::Triangle,
            render_target_formats: &[RENDER_TARGET_FORMAT],
            sample_desc: SampleDesc::default(),
            sample_mask: u32::MAX,
        }
    }

    /// Bakes the pipeline state object against `root_signature`.
    pub fn create_pipeline_state(
        device: &A::Device,
        root_signature: &A::RootSignature,
        shaders: &dyn ShaderSource,
    ) -> Result<A::PipelineState, RenderError> {
        let (vertex, pixel) = Self::load_shaders(shaders)?;
        let descriptor = Self::pipeline_descriptor(root_signature, &vertex, &pixel);
        device
            .create_graphics_pipeline_state(&descriptor)
            .map_err(RenderError::PipelineStateCreationFailed)
    }

    /// Assembles the layer from objects created separately.
    pub fn from_parts(root_signature: A::RootSignature, pipeline_state: A::PipelineState) -> Self {
        Self {
            pipeline_state,
            root_signature,
        }
    }

    /// The pipeline state object.
    pub fn pipeline_state(&self) -> &A::PipelineState {
        &self.pipeline_state
    }

    /// The root signature.
    pub fn root_signature(&self) -> &A::RootSignature {
        &self.root_signature
    }
}
