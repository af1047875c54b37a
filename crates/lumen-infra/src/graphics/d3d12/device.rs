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

use super::command::{D3D12CommandAllocator, D3D12CommandList, D3D12CommandQueue};
use super::conversions::{
    feature_level_from_d3d12, min_precision_from_d3d12, root_signature_version_from_d3d12,
    IntoD3D12,
};
use super::error::OrApiError;
use super::resource::{D3D12DescriptorHeap, D3D12PipelineState, D3D12Resource, D3D12RootSignature};
use super::sync::{D3D12Event, D3D12Fence};
use super::D3D12;
use lumen_core::renderer::*;
use std::ffi::{c_void, CString};
use std::mem::{size_of, ManuallyDrop};
use windows::core::PCSTR;
use windows::Win32::Foundation::{BOOL, E_INVALIDARG};
use windows::Win32::Graphics::Direct3D::{ID3DBlob, D3D_FEATURE_LEVEL};
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT_UNKNOWN, DXGI_SAMPLE_DESC};
use windows::Win32::System::Threading::CreateEventA;

const MAX_RENDER_TARGETS: usize = 8;

/// The Direct3D 12 logical device.
pub struct D3D12Device {
    raw: ID3D12Device,
}

impl D3D12Device {
    pub(crate) fn new(raw: ID3D12Device) -> Self {
        Self { raw }
    }

    fn feature<T>(&self, feature: D3D12_FEATURE, data: &mut T) -> Result<(), ApiError> {
        unsafe {
            self.raw.CheckFeatureSupport(
                feature,
                data as *mut T as *mut c_void,
                size_of::<T>() as u32,
            )
        }
        .or_api_error()
    }
}

fn shader_bytecode(shader: &ShaderBytecode) -> D3D12_SHADER_BYTECODE {
    D3D12_SHADER_BYTECODE {
        pShaderBytecode: shader.as_bytes().as_ptr() as *const c_void,
        BytecodeLength: shader.len(),
    }
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
    }
}

impl Device<D3D12> for D3D12Device {
    fn check_feature_levels(&self, requested: &[FeatureLevel]) -> Result<FeatureLevel, ApiError> {
        let levels: Vec<D3D_FEATURE_LEVEL> =
            requested.iter().map(|level| level.into_d3d12()).collect();
        let mut data = D3D12_FEATURE_DATA_FEATURE_LEVELS {
            NumFeatureLevels: levels.len() as u32,
            pFeatureLevelsRequested: levels.as_ptr(),
            ..Default::default()
        };
        self.feature(D3D12_FEATURE_FEATURE_LEVELS, &mut data)?;
        feature_level_from_d3d12(data.MaxSupportedFeatureLevel).ok_or_else(|| {
            ApiError::Unsupported(format!(
                "unknown feature level 0x{:x}",
                data.MaxSupportedFeatureLevel.0
            ))
        })
    }

    fn check_shader_model(&self, highest: ShaderModel) -> Result<ShaderModel, ApiError> {
        // Runtimes older than the requested model reject it as an invalid argument;
        // step down until one is recognized.
        let mut candidate = highest;
        loop {
            let mut data = D3D12_FEATURE_DATA_SHADER_MODEL {
                HighestShaderModel: candidate.into_d3d12(),
            };
            match self.feature(D3D12_FEATURE_SHADER_MODEL, &mut data) {
                Ok(()) => return Ok(ShaderModel::from_packed(data.HighestShaderModel.0 as u32)),
                Err(ApiError::InvalidArgument(_)) if candidate.minor > 0 => {
                    candidate.minor -= 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn check_root_signature_version(
        &self,
        highest: RootSignatureVersion,
    ) -> Result<RootSignatureVersion, ApiError> {
        let mut data = D3D12_FEATURE_DATA_ROOT_SIGNATURE {
            HighestVersion: highest.into_d3d12(),
        };
        match self.feature(D3D12_FEATURE_ROOT_SIGNATURE, &mut data) {
            Ok(()) => Ok(root_signature_version_from_d3d12(data.HighestVersion)),
            Err(ApiError::InvalidArgument(_)) if highest > RootSignatureVersion::V1_0 => {
                Ok(RootSignatureVersion::V1_0)
            }
            Err(e) => Err(e),
        }
    }

    fn check_architecture(&self, node_index: u32) -> Result<ArchitectureInfo, ApiError> {
        let mut data = D3D12_FEATURE_DATA_ARCHITECTURE1 {
            NodeIndex: node_index,
            ..Default::default()
        };
        self.feature(D3D12_FEATURE_ARCHITECTURE1, &mut data)?;
        Ok(ArchitectureInfo {
            tile_based_renderer: data.TileBasedRenderer.as_bool(),
            uma: data.UMA.as_bool(),
            cache_coherent_uma: data.CacheCoherentUMA.as_bool(),
            isolated_mmu: data.IsolatedMMU.as_bool(),
        })
    }

    fn check_virtual_address_support(&self) -> Result<VirtualAddressSupport, ApiError> {
        let mut data = D3D12_FEATURE_DATA_GPU_VIRTUAL_ADDRESS_SUPPORT::default();
        self.feature(D3D12_FEATURE_GPU_VIRTUAL_ADDRESS_SUPPORT, &mut data)?;
        Ok(VirtualAddressSupport {
            max_bits_per_resource: data.MaxGPUVirtualAddressBitsPerResource,
            max_bits_per_process: data.MaxGPUVirtualAddressBitsPerProcess,
        })
    }

    fn check_options(&self) -> Result<DeviceOptions, ApiError> {
        let mut data = D3D12_FEATURE_DATA_D3D12_OPTIONS::default();
        self.feature(D3D12_FEATURE_D3D12_OPTIONS, &mut data)?;
        Ok(DeviceOptions {
            double_precision_float_shader_ops: data.DoublePrecisionFloatShaderOps.as_bool(),
            output_merger_logic_op: data.OutputMergerLogicOp.as_bool(),
            min_precision_support: min_precision_from_d3d12(data.MinPrecisionSupport),
            tiled_resources_tier: data.TiledResourcesTier.0 as u32,
            resource_binding_tier: data.ResourceBindingTier.0 as u32,
            ps_specified_stencil_ref_supported: data.PSSpecifiedStencilRefSupported.as_bool(),
            typed_uav_load_additional_formats: data.TypedUAVLoadAdditionalFormats.as_bool(),
            rovs_supported: data.ROVsSupported.as_bool(),
            conservative_rasterization_tier: data.ConservativeRasterizationTier.0 as u32,
            standard_swizzle_64kb_supported: data.StandardSwizzle64KBSupported.as_bool(),
            resource_heap_tier: data.ResourceHeapTier.0 as u32,
        })
    }

    fn check_wave_ops(&self) -> Result<WaveOpsInfo, ApiError> {
        let mut data = D3D12_FEATURE_DATA_D3D12_OPTIONS1::default();
        self.feature(D3D12_FEATURE_D3D12_OPTIONS1, &mut data)?;
        Ok(WaveOpsInfo {
            wave_ops: data.WaveOps.as_bool(),
            wave_lane_count_min: data.WaveLaneCountMin,
            total_lane_count: data.TotalLaneCount,
            int64_shader_ops: data.Int64ShaderOps.as_bool(),
        })
    }

    fn create_command_queue(
        &self,
        descriptor: &CommandQueueDescriptor,
    ) -> Result<D3D12CommandQueue, ApiError> {
        let desc = D3D12_COMMAND_QUEUE_DESC {
            Type: descriptor.kind.into_d3d12(),
            Priority: descriptor.priority,
            Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
            NodeMask: descriptor.node_mask,
        };
        let raw = unsafe { self.raw.CreateCommandQueue(&desc) }.or_api_error()?;
        Ok(D3D12CommandQueue::new(raw))
    }

    fn create_command_allocator(
        &self,
        kind: CommandListType,
    ) -> Result<D3D12CommandAllocator, ApiError> {
        let raw = unsafe { self.raw.CreateCommandAllocator(kind.into_d3d12()) }.or_api_error()?;
        Ok(D3D12CommandAllocator::new(raw))
    }

    fn create_command_list(
        &self,
        kind: CommandListType,
        allocator: &D3D12CommandAllocator,
        initial_state: Option<&D3D12PipelineState>,
    ) -> Result<D3D12CommandList, ApiError> {
        let raw: ID3D12GraphicsCommandList = unsafe {
            self.raw.CreateCommandList(
                0,
                kind.into_d3d12(),
                allocator.raw(),
                initial_state.map(D3D12PipelineState::raw),
            )
        }
        .or_api_error()?;
        Ok(D3D12CommandList::new(raw, kind))
    }

    fn create_descriptor_heap(
        &self,
        descriptor: &DescriptorHeapDescriptor,
    ) -> Result<D3D12DescriptorHeap, ApiError> {
        let desc = D3D12_DESCRIPTOR_HEAP_DESC {
            Type: descriptor.kind.into_d3d12(),
            NumDescriptors: descriptor.num_descriptors,
            Flags: if descriptor.shader_visible {
                D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
            } else {
                D3D12_DESCRIPTOR_HEAP_FLAG_NONE
            },
            NodeMask: 0,
        };
        let raw = unsafe { self.raw.CreateDescriptorHeap(&desc) }.or_api_error()?;
        Ok(D3D12DescriptorHeap::new(raw))
    }

    fn descriptor_handle_increment_size(&self, kind: DescriptorHeapType) -> u32 {
        unsafe { self.raw.GetDescriptorHandleIncrementSize(kind.into_d3d12()) }
    }

    fn create_render_target_view(
        &self,
        resource: &D3D12Resource,
        destination: CpuDescriptorHandle,
    ) -> Result<(), ApiError> {
        unsafe {
            self.raw
                .CreateRenderTargetView(resource.raw(), None, destination.into_d3d12())
        };
        Ok(())
    }

    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Result<D3D12RootSignature, ApiError> {
        let parameters: Vec<D3D12_ROOT_PARAMETER> = descriptor
            .parameters
            .iter()
            .map(|parameter| match *parameter {
                RootParameter::Constants32Bit {
                    shader_register,
                    register_space,
                    num_values,
                    visibility,
                } => D3D12_ROOT_PARAMETER {
                    ParameterType: D3D12_ROOT_PARAMETER_TYPE_32BIT_CONSTANTS,
                    Anonymous: D3D12_ROOT_PARAMETER_0 {
                        Constants: D3D12_ROOT_CONSTANTS {
                            ShaderRegister: shader_register,
                            RegisterSpace: register_space,
                            Num32BitValues: num_values,
                        },
                    },
                    ShaderVisibility: visibility.into_d3d12(),
                },
            })
            .collect();
        let desc = D3D12_ROOT_SIGNATURE_DESC {
            NumParameters: parameters.len() as u32,
            pParameters: parameters.as_ptr(),
            NumStaticSamplers: 0,
            pStaticSamplers: std::ptr::null(),
            Flags: D3D12_ROOT_SIGNATURE_FLAGS(descriptor.flags.bits() as i32),
        };

        let mut signature: Option<ID3DBlob> = None;
        let mut errors: Option<ID3DBlob> = None;
        let serialized = unsafe {
            D3D12SerializeRootSignature(
                &desc,
                descriptor.version.into_d3d12(),
                &mut signature,
                Some(&mut errors),
            )
        };
        if let Err(e) = serialized {
            let details = errors
                .as_ref()
                .map(|blob| {
                    String::from_utf8_lossy(blob_bytes(blob))
                        .trim_end_matches('\0')
                        .to_string()
                })
                .unwrap_or_else(|| e.message().to_string());
            return Err(if e.code() == E_INVALIDARG {
                ApiError::InvalidArgument(details)
            } else {
                ApiError::Backend {
                    code: e.code().0,
                    message: details,
                }
            });
        }
        let signature = signature.ok_or_else(|| {
            ApiError::InvalidCall("root signature serialization produced no blob".to_string())
        })?;
        let raw =
            unsafe { self.raw.CreateRootSignature(0, blob_bytes(&signature)) }.or_api_error()?;
        Ok(D3D12RootSignature::new(raw))
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineDescriptor<'_, D3D12RootSignature>,
    ) -> Result<D3D12PipelineState, ApiError> {
        let semantic_names = descriptor
            .input_layout
            .iter()
            .map(|element| {
                CString::new(element.semantic_name).map_err(|_| {
                    ApiError::InvalidArgument(format!(
                        "semantic name {:?} contains a NUL byte",
                        element.semantic_name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let input_elements: Vec<D3D12_INPUT_ELEMENT_DESC> = descriptor
            .input_layout
            .iter()
            .zip(&semantic_names)
            .map(|(element, name)| D3D12_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(name.as_ptr() as *const u8),
                SemanticIndex: element.semantic_index,
                Format: element.format.into_d3d12(),
                InputSlot: element.input_slot,
                AlignedByteOffset: element.aligned_byte_offset,
                InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();

        let targets = descriptor.render_target_formats;
        if targets.is_empty() || targets.len() > MAX_RENDER_TARGETS {
            return Err(ApiError::InvalidArgument(format!(
                "{} render targets, expected 1 to {MAX_RENDER_TARGETS}",
                targets.len()
            )));
        }
        let mut rtv_formats = [DXGI_FORMAT_UNKNOWN; MAX_RENDER_TARGETS];
        for (slot, format) in rtv_formats.iter_mut().zip(targets) {
            *slot = format.into_d3d12();
        }

        let desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
            pRootSignature: ManuallyDrop::new(Some(descriptor.root_signature.raw().clone())),
            VS: shader_bytecode(descriptor.vertex_shader),
            PS: shader_bytecode(descriptor.pixel_shader),
            BlendState: D3D12_BLEND_DESC {
                AlphaToCoverageEnable: BOOL::from(false),
                IndependentBlendEnable: BOOL::from(false),
                RenderTarget: [descriptor.blend.into_d3d12(); MAX_RENDER_TARGETS],
            },
            SampleMask: descriptor.sample_mask,
            RasterizerState: descriptor.rasterizer.into_d3d12(),
            DepthStencilState: D3D12_DEPTH_STENCIL_DESC {
                DepthEnable: BOOL::from(descriptor.depth_stencil.depth_enable),
                StencilEnable: BOOL::from(descriptor.depth_stencil.stencil_enable),
                ..Default::default()
            },
            InputLayout: D3D12_INPUT_LAYOUT_DESC {
                pInputElementDescs: input_elements.as_ptr(),
                NumElements: input_elements.len() as u32,
            },
            PrimitiveTopologyType: descriptor.topology_type.into_d3d12(),
            NumRenderTargets: targets.len() as u32,
            RTVFormats: rtv_formats,
            DSVFormat: DXGI_FORMAT_UNKNOWN,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: descriptor.sample_desc.count,
                Quality: descriptor.sample_desc.quality,
            },
            ..Default::default()
        };
        let result = unsafe { self.raw.CreateGraphicsPipelineState(&desc) };
        // The descriptor holds its own reference to the root signature.
        drop(ManuallyDrop::into_inner(desc.pRootSignature));
        let raw = result.or_api_error()?;
        Ok(D3D12PipelineState::new(raw))
    }

    fn create_committed_buffer(
        &self,
        descriptor: &BufferDescriptor,
    ) -> Result<D3D12Resource, ApiError> {
        let heap = D3D12_HEAP_PROPERTIES {
            Type: descriptor.heap.into_d3d12(),
            CPUPageProperty: D3D12_CPU_PAGE_PROPERTY_UNKNOWN,
            MemoryPoolPreference: D3D12_MEMORY_POOL_UNKNOWN,
            CreationNodeMask: 1,
            VisibleNodeMask: 1,
        };
        let desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
            Alignment: 0,
            Width: descriptor.size,
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: DXGI_FORMAT_UNKNOWN,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            Flags: D3D12_RESOURCE_FLAG_NONE,
        };
        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.raw.CreateCommittedResource(
                &heap,
                D3D12_HEAP_FLAG_NONE,
                &desc,
                descriptor.initial_state.into_d3d12(),
                None,
                &mut resource,
            )
        }
        .or_api_error()?;
        let raw = resource.ok_or_else(|| {
            ApiError::InvalidCall("CreateCommittedResource returned no resource".to_string())
        })?;
        Ok(D3D12Resource::new(raw))
    }

    fn create_fence(&self, initial_value: u64) -> Result<D3D12Fence, ApiError> {
        let raw = unsafe { self.raw.CreateFence(initial_value, D3D12_FENCE_FLAG_NONE) }
            .or_api_error()?;
        Ok(D3D12Fence::new(raw))
    }

    fn create_event(&self) -> Result<D3D12Event, ApiError> {
        let handle = unsafe { CreateEventA(None, false, false, None) }.or_api_error()?;
        Ok(D3D12Event::new(handle))
    }
}
