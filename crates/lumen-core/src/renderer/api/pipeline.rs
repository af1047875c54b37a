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

//! Root signatures and graphics pipeline state.

use super::{ShaderBytecode, TextureFormat};
use crate::lumen_bitflags;

/// Which shader stages can see a root parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderVisibility {
    /// Every stage.
    All,
    /// Vertex stage only.
    Vertex,
    /// Pixel stage only.
    Pixel,
}

lumen_bitflags! {
    /// Root signature creation flags.
    pub struct RootSignatureFlags: u32 {
        /// The pipeline uses an input layout; required to bind vertex buffers.
        const ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT = 0x1;
        /// Deny root access to the vertex stage.
        const DENY_VERTEX_SHADER_ROOT_ACCESS = 0x2;
        /// Deny root access to the pixel stage.
        const DENY_PIXEL_SHADER_ROOT_ACCESS = 0x20;
    }
}

/// One entry of a root signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootParameter {
    /// 32-bit values pushed inline into the command list.
    Constants32Bit {
        /// The `b` register the constants bind to.
        shader_register: u32,
        /// The register space.
        register_space: u32,
        /// How many 32-bit values.
        num_values: u32,
        /// Stages that can read them.
        visibility: ShaderVisibility,
    },
}

impl RootParameter {
    /// Number of 32-bit values the parameter occupies.
    pub fn num_values(&self) -> u32 {
        match self {
            RootParameter::Constants32Bit { num_values, .. } => *num_values,
        }
    }
}

/// Describes the binding contract between the command list and the shaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSignatureDescriptor {
    /// Root parameters in slot order.
    pub parameters: Vec<RootParameter>,
    /// Creation flags.
    pub flags: RootSignatureFlags,
    /// Serialization version.
    pub version: super::RootSignatureVersion,
}

impl RootSignatureDescriptor {
    /// One vertex-visible 32-bit constant in `b0` with input layouts allowed.
    pub fn single_vertex_constant() -> Self {
        Self {
            parameters: vec![RootParameter::Constants32Bit {
                shader_register: 0,
                register_space: 0,
                num_values: 1,
                visibility: ShaderVisibility::Vertex,
            }],
            flags: RootSignatureFlags::ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
            version: super::RootSignatureVersion::V1_0,
        }
    }
}

/// Format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Four 32-bit floats.
    Float32x4,
}

impl VertexFormat {
    /// Size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x4 => 16,
        }
    }
}

/// One element of the input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    /// HLSL semantic name, e.g. `POSITION`.
    pub semantic_name: &'static str,
    /// Semantic index.
    pub semantic_index: u32,
    /// Attribute format.
    pub format: VertexFormat,
    /// Vertex buffer slot.
    pub input_slot: u32,
    /// Byte offset inside the vertex.
    pub aligned_byte_offset: u32,
}

/// A blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source alpha.
    SrcAlpha,
    /// One minus source alpha.
    InvSrcAlpha,
}

/// A blend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// `src + dst`
    Add,
    /// `src - dst`
    Subtract,
}

lumen_bitflags! {
    /// Channels written to a render target.
    pub struct ColorWriteMask: u8 {
        /// Red.
        const RED = 0b0001;
        /// Green.
        const GREEN = 0b0010;
        /// Blue.
        const BLUE = 0b0100;
        /// Alpha.
        const ALPHA = 0b1000;
        /// All four channels.
        const ALL = 0b1111;
    }
}

/// Blend state of one render target. Field names follow the platform's blend
/// descriptor.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetBlend {
    pub blend_enable: bool,
    pub src_blend: BlendFactor,
    pub dest_blend: BlendFactor,
    pub blend_op: BlendOp,
    pub src_blend_alpha: BlendFactor,
    pub dest_blend_alpha: BlendFactor,
    pub blend_op_alpha: BlendOp,
    pub write_mask: ColorWriteMask,
}

impl RenderTargetBlend {
    /// Standard "over" blending: `src * a + dst * (1 - a)`, alpha kept from the
    /// source.
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            src_blend: BlendFactor::SrcAlpha,
            dest_blend: BlendFactor::InvSrcAlpha,
            blend_op: BlendOp::Add,
            src_blend_alpha: BlendFactor::One,
            dest_blend_alpha: BlendFactor::Zero,
            blend_op_alpha: BlendOp::Add,
            write_mask: ColorWriteMask::ALL,
        }
    }
}

/// Face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Draw both faces.
    None,
    /// Skip front faces.
    Front,
    /// Skip back faces.
    Back,
}

/// Rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerState {
    /// Face culling.
    pub cull_mode: CullMode,
    /// Counter-clockwise triangles are front facing.
    pub front_counter_clockwise: bool,
    /// Clip against the depth range.
    pub depth_clip_enable: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_counter_clockwise: false,
            depth_clip_enable: true,
        }
    }
}

/// Depth/stencil state. Both tests are off unless enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthStencilState {
    /// Depth test enabled.
    pub depth_enable: bool,
    /// Stencil test enabled.
    pub stencil_enable: bool,
}

/// The primitive class a pipeline rasterizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopologyType {
    /// Triangles, listed or stripped.
    Triangle,
    /// Lines.
    Line,
    /// Points.
    Point,
}

/// Multisampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDesc {
    /// Samples per pixel.
    pub count: u32,
    /// Quality level.
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self {
            count: 1,
            quality: 0,
        }
    }
}

/// Everything baked into a graphics pipeline state object.
#[derive(Debug, Clone)]
pub struct GraphicsPipelineDescriptor<'a, R> {
    /// The root signature the pipeline is bound to.
    pub root_signature: &'a R,
    /// Vertex stage bytecode.
    pub vertex_shader: &'a ShaderBytecode,
    /// Pixel stage bytecode.
    pub pixel_shader: &'a ShaderBytecode,
    /// Input layout.
    pub input_layout: &'a [InputElement],
    /// Blend state of render target 0.
    pub blend: RenderTargetBlend,
    /// Rasterizer state.
    pub rasterizer: RasterizerState,
    /// Depth/stencil state.
    pub depth_stencil: DepthStencilState,
    /// Primitive class.
    pub topology_type: PrimitiveTopologyType,
    /// Render target formats, one per target.
    pub render_target_formats: &'a [TextureFormat],
    /// Multisampling.
    pub sample_desc: SampleDesc,
    /// Sample mask.
    pub sample_mask: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_vertex_constant_layout() {
        let desc = RootSignatureDescriptor::single_vertex_constant();
        assert_eq!(desc.parameters.len(), 1);
        assert_eq!(desc.parameters[0].num_values(), 1);
        assert!(desc
            .flags
            .contains(RootSignatureFlags::ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT));
        assert!(matches!(
            desc.parameters[0],
            RootParameter::Constants32Bit {
                shader_register: 0,
                visibility: ShaderVisibility::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn alpha_blending_uses_source_alpha() {
        let blend = RenderTargetBlend::alpha_blending();
        assert!(blend.blend_enable);
        assert_eq!(blend.src_blend, BlendFactor::SrcAlpha);
        assert_eq!(blend.dest_blend, BlendFactor::InvSrcAlpha);
        assert_eq!(blend.write_mask, ColorWriteMask::ALL);
    }
}
