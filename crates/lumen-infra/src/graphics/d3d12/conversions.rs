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

use lumen_core::renderer::{
    BlendFactor, BlendOp, CommandListType, CpuDescriptorHandle, CullMode, DescriptorHeapType,
    FeatureLevel, HeapType, MinPrecisionSupport, PrimitiveTopology, PrimitiveTopologyType,
    RasterizerState, RenderTargetBlend, ResourceState, RootSignatureVersion, ScissorRect,
    ShaderModel, ShaderVisibility, SwapEffect, TextureFormat, VertexBufferView, VertexFormat,
    Viewport,
};
use windows::Win32::Foundation::{BOOL, RECT};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

/// A local extension trait to convert backend-agnostic types into Direct3D 12 types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_d3d12()` syntax.
pub trait IntoD3D12<T> {
    /// Consumes self and converts it into a Direct3D 12 type.
    fn into_d3d12(self) -> T;
}

// --- Device ---

impl IntoD3D12<D3D_FEATURE_LEVEL> for FeatureLevel {
    fn into_d3d12(self) -> D3D_FEATURE_LEVEL {
        match self {
            FeatureLevel::Level1_0Core => D3D_FEATURE_LEVEL_1_0_CORE,
            FeatureLevel::Level9_1 => D3D_FEATURE_LEVEL_9_1,
            FeatureLevel::Level9_2 => D3D_FEATURE_LEVEL_9_2,
            FeatureLevel::Level9_3 => D3D_FEATURE_LEVEL_9_3,
            FeatureLevel::Level10_0 => D3D_FEATURE_LEVEL_10_0,
            FeatureLevel::Level10_1 => D3D_FEATURE_LEVEL_10_1,
            FeatureLevel::Level11_0 => D3D_FEATURE_LEVEL_11_0,
            FeatureLevel::Level11_1 => D3D_FEATURE_LEVEL_11_1,
            FeatureLevel::Level12_0 => D3D_FEATURE_LEVEL_12_0,
            FeatureLevel::Level12_1 => D3D_FEATURE_LEVEL_12_1,
            FeatureLevel::Level12_2 => D3D_FEATURE_LEVEL_12_2,
        }
    }
}

/// Maps a feature level reported by the runtime back to ours.
pub fn feature_level_from_d3d12(level: D3D_FEATURE_LEVEL) -> Option<FeatureLevel> {
    Some(match level {
        D3D_FEATURE_LEVEL_1_0_CORE => FeatureLevel::Level1_0Core,
        D3D_FEATURE_LEVEL_9_1 => FeatureLevel::Level9_1,
        D3D_FEATURE_LEVEL_9_2 => FeatureLevel::Level9_2,
        D3D_FEATURE_LEVEL_9_3 => FeatureLevel::Level9_3,
        D3D_FEATURE_LEVEL_10_0 => FeatureLevel::Level10_0,
        D3D_FEATURE_LEVEL_10_1 => FeatureLevel::Level10_1,
        D3D_FEATURE_LEVEL_11_0 => FeatureLevel::Level11_0,
        D3D_FEATURE_LEVEL_11_1 => FeatureLevel::Level11_1,
        D3D_FEATURE_LEVEL_12_0 => FeatureLevel::Level12_0,
        D3D_FEATURE_LEVEL_12_1 => FeatureLevel::Level12_1,
        D3D_FEATURE_LEVEL_12_2 => FeatureLevel::Level12_2,
        _ => return None,
    })
}

impl IntoD3D12<D3D_SHADER_MODEL> for ShaderModel {
    fn into_d3d12(self) -> D3D_SHADER_MODEL {
        D3D_SHADER_MODEL(self.packed() as i32)
    }
}

impl IntoD3D12<D3D_ROOT_SIGNATURE_VERSION> for RootSignatureVersion {
    fn into_d3d12(self) -> D3D_ROOT_SIGNATURE_VERSION {
        match self {
            RootSignatureVersion::V1_0 => D3D_ROOT_SIGNATURE_VERSION_1_0,
            RootSignatureVersion::V1_1 => D3D_ROOT_SIGNATURE_VERSION_1_1,
        }
    }
}

pub fn root_signature_version_from_d3d12(
    version: D3D_ROOT_SIGNATURE_VERSION,
) -> RootSignatureVersion {
    if version.0 >= D3D_ROOT_SIGNATURE_VERSION_1_1.0 {
        RootSignatureVersion::V1_1
    } else {
        RootSignatureVersion::V1_0
    }
}

pub fn min_precision_from_d3d12(support: D3D12_SHADER_MIN_PRECISION_SUPPORT) -> MinPrecisionSupport {
    if support.0 & D3D12_SHADER_MIN_PRECISION_SUPPORT_16_BIT.0 != 0 {
        MinPrecisionSupport::Bits16
    } else if support.0 & D3D12_SHADER_MIN_PRECISION_SUPPORT_10_BIT.0 != 0 {
        MinPrecisionSupport::Bits10
    } else {
        MinPrecisionSupport::None
    }
}

// --- Commands ---

impl IntoD3D12<D3D12_COMMAND_LIST_TYPE> for CommandListType {
    fn into_d3d12(self) -> D3D12_COMMAND_LIST_TYPE {
        match self {
            CommandListType::Direct => D3D12_COMMAND_LIST_TYPE_DIRECT,
            CommandListType::Bundle => D3D12_COMMAND_LIST_TYPE_BUNDLE,
        }
    }
}

impl IntoD3D12<D3D12_RESOURCE_STATES> for ResourceState {
    fn into_d3d12(self) -> D3D12_RESOURCE_STATES {
        match self {
            ResourceState::Present => D3D12_RESOURCE_STATE_PRESENT,
            ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
            ResourceState::GenericRead => D3D12_RESOURCE_STATE_GENERIC_READ,
        }
    }
}

impl IntoD3D12<D3D12_VIEWPORT> for Viewport {
    fn into_d3d12(self) -> D3D12_VIEWPORT {
        D3D12_VIEWPORT {
            TopLeftX: self.x,
            TopLeftY: self.y,
            Width: self.width,
            Height: self.height,
            MinDepth: self.min_depth,
            MaxDepth: self.max_depth,
        }
    }
}

impl IntoD3D12<RECT> for ScissorRect {
    fn into_d3d12(self) -> RECT {
        RECT {
            left: self.left,
            top: self.top,
            right: self.right,
            bottom: self.bottom,
        }
    }
}

impl IntoD3D12<D3D_PRIMITIVE_TOPOLOGY> for PrimitiveTopology {
    fn into_d3d12(self) -> D3D_PRIMITIVE_TOPOLOGY {
        match self {
            PrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
            PrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
        }
    }
}

impl IntoD3D12<D3D12_VERTEX_BUFFER_VIEW> for VertexBufferView {
    fn into_d3d12(self) -> D3D12_VERTEX_BUFFER_VIEW {
        D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: self.buffer_location,
            SizeInBytes: self.size_in_bytes,
            StrideInBytes: self.stride_in_bytes,
        }
    }
}

impl IntoD3D12<D3D12_CPU_DESCRIPTOR_HANDLE> for CpuDescriptorHandle {
    fn into_d3d12(self) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        D3D12_CPU_DESCRIPTOR_HANDLE { ptr: self.ptr }
    }
}

// --- Resources and descriptors ---

impl IntoD3D12<D3D12_HEAP_TYPE> for HeapType {
    fn into_d3d12(self) -> D3D12_HEAP_TYPE {
        match self {
            HeapType::Default => D3D12_HEAP_TYPE_DEFAULT,
            HeapType::Upload => D3D12_HEAP_TYPE_UPLOAD,
            HeapType::Readback => D3D12_HEAP_TYPE_READBACK,
        }
    }
}

impl IntoD3D12<D3D12_DESCRIPTOR_HEAP_TYPE> for DescriptorHeapType {
    fn into_d3d12(self) -> D3D12_DESCRIPTOR_HEAP_TYPE {
        match self {
            DescriptorHeapType::RenderTargetView => D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
            DescriptorHeapType::CbvSrvUav => D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        }
    }
}

impl IntoD3D12<DXGI_FORMAT> for TextureFormat {
    fn into_d3d12(self) -> DXGI_FORMAT {
        match self {
            TextureFormat::Rgba8Unorm => DXGI_FORMAT_R8G8B8A8_UNORM,
            TextureFormat::Rgba32Float => DXGI_FORMAT_R32G32B32A32_FLOAT,
        }
    }
}

impl IntoD3D12<DXGI_SWAP_EFFECT> for SwapEffect {
    fn into_d3d12(self) -> DXGI_SWAP_EFFECT {
        match self {
            SwapEffect::FlipSequential => DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL,
            SwapEffect::FlipDiscard => DXGI_SWAP_EFFECT_FLIP_DISCARD,
        }
    }
}

// --- Pipeline ---

impl IntoD3D12<D3D12_SHADER_VISIBILITY> for ShaderVisibility {
    fn into_d3d12(self) -> D3D12_SHADER_VISIBILITY {
        match self {
            ShaderVisibility::All => D3D12_SHADER_VISIBILITY_ALL,
            ShaderVisibility::Vertex => D3D12_SHADER_VISIBILITY_VERTEX,
            ShaderVisibility::Pixel => D3D12_SHADER_VISIBILITY_PIXEL,
        }
    }
}

impl IntoD3D12<DXGI_FORMAT> for VertexFormat {
    fn into_d3d12(self) -> DXGI_FORMAT {
        match self {
            VertexFormat::Float32x2 => DXGI_FORMAT_R32G32_FLOAT,
            VertexFormat::Float32x4 => DXGI_FORMAT_R32G32B32A32_FLOAT,
        }
    }
}

impl IntoD3D12<D3D12_BLEND> for BlendFactor {
    fn into_d3d12(self) -> D3D12_BLEND {
        match self {
            BlendFactor::Zero => D3D12_BLEND_ZERO,
            BlendFactor::One => D3D12_BLEND_ONE,
            BlendFactor::SrcAlpha => D3D12_BLEND_SRC_ALPHA,
            BlendFactor::InvSrcAlpha => D3D12_BLEND_INV_SRC_ALPHA,
        }
    }
}

impl IntoD3D12<D3D12_BLEND_OP> for BlendOp {
    fn into_d3d12(self) -> D3D12_BLEND_OP {
        match self {
            BlendOp::Add => D3D12_BLEND_OP_ADD,
            BlendOp::Subtract => D3D12_BLEND_OP_SUBTRACT,
        }
    }
}

impl IntoD3D12<D3D12_RENDER_TARGET_BLEND_DESC> for RenderTargetBlend {
    fn into_d3d12(self) -> D3D12_RENDER_TARGET_BLEND_DESC {
        D3D12_RENDER_TARGET_BLEND_DESC {
            BlendEnable: BOOL::from(self.blend_enable),
            LogicOpEnable: BOOL::from(false),
            SrcBlend: self.src_blend.into_d3d12(),
            DestBlend: self.dest_blend.into_d3d12(),
            BlendOp: self.blend_op.into_d3d12(),
            SrcBlendAlpha: self.src_blend_alpha.into_d3d12(),
            DestBlendAlpha: self.dest_blend_alpha.into_d3d12(),
            BlendOpAlpha: self.blend_op_alpha.into_d3d12(),
            LogicOp: D3D12_LOGIC_OP_NOOP,
            RenderTargetWriteMask: self.write_mask.bits(),
        }
    }
}

impl IntoD3D12<D3D12_CULL_MODE> for CullMode {
    fn into_d3d12(self) -> D3D12_CULL_MODE {
        match self {
            CullMode::None => D3D12_CULL_MODE_NONE,
            CullMode::Front => D3D12_CULL_MODE_FRONT,
            CullMode::Back => D3D12_CULL_MODE_BACK,
        }
    }
}

impl IntoD3D12<D3D12_RASTERIZER_DESC> for RasterizerState {
    fn into_d3d12(self) -> D3D12_RASTERIZER_DESC {
        D3D12_RASTERIZER_DESC {
            FillMode: D3D12_FILL_MODE_SOLID,
            CullMode: self.cull_mode.into_d3d12(),
            FrontCounterClockwise: BOOL::from(self.front_counter_clockwise),
            DepthBias: D3D12_DEFAULT_DEPTH_BIAS as i32,
            DepthBiasClamp: D3D12_DEFAULT_DEPTH_BIAS_CLAMP,
            SlopeScaledDepthBias: D3D12_DEFAULT_SLOPE_SCALED_DEPTH_BIAS,
            DepthClipEnable: BOOL::from(self.depth_clip_enable),
            MultisampleEnable: BOOL::from(false),
            AntialiasedLineEnable: BOOL::from(false),
            ForcedSampleCount: 0,
            ConservativeRaster: D3D12_CONSERVATIVE_RASTERIZATION_MODE_OFF,
        }
    }
}

impl IntoD3D12<D3D12_PRIMITIVE_TOPOLOGY_TYPE> for PrimitiveTopologyType {
    fn into_d3d12(self) -> D3D12_PRIMITIVE_TOPOLOGY_TYPE {
        match self {
            PrimitiveTopologyType::Triangle => D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
            PrimitiveTopologyType::Line => D3D12_PRIMITIVE_TOPOLOGY_TYPE_LINE,
            PrimitiveTopologyType::Point => D3D12_PRIMITIVE_TOPOLOGY_TYPE_POINT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_levels_round_trip() {
        for level in FeatureLevel::QUERIED {
            assert_eq!(feature_level_from_d3d12(level.into_d3d12()), Some(level));
        }
    }

    #[test]
    fn shader_model_is_packed_as_major_minor_nibbles() {
        let model: D3D_SHADER_MODEL = ShaderModel::HIGHEST_REQUESTED.into_d3d12();
        assert_eq!(model, D3D_SHADER_MODEL_6_7);
    }
}
