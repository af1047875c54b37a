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

use super::command::{
    AllocatorRecord, HeadlessCommandAllocator, HeadlessCommandList, HeadlessCommandQueue,
    ListRecord,
};
use super::config::HeadlessAdapterDesc;
use super::fault::Call;
use super::resource::{
    HeadlessDescriptorHeap, HeadlessPipelineState, HeadlessResource, HeadlessRootSignature,
};
use super::state::TrackedObject;
use super::sync::{HeadlessEvent, HeadlessFence};
use super::tracker::ObjectKind;
use super::Headless;
use lumen_core::renderer::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const RTV_DESCRIPTOR_SIZE: u32 = 32;
const CBV_SRV_UAV_DESCRIPTOR_SIZE: u32 = 64;
const DESCRIPTOR_HEAP_SPACING: usize = 0x10_0000;
const MAX_RENDER_TARGETS: usize = 8;

/// A simulated logical device on one configured adapter.
#[derive(Debug)]
pub struct HeadlessDevice {
    pub(crate) tracked: TrackedObject,
    pub(crate) adapter: HeadlessAdapterDesc,
}

impl HeadlessDevice {
    fn query(&self) -> Result<(), ApiError> {
        self.tracked.shared().enter(Call::CheckFeatureSupport)
    }

    fn track(&self, kind: ObjectKind) -> TrackedObject {
        self.tracked.shared().track(kind)
    }
}

impl Device<Headless> for HeadlessDevice {
    fn check_feature_levels(&self, requested: &[FeatureLevel]) -> Result<FeatureLevel, ApiError> {
        self.query()?;
        if requested.is_empty() {
            return Err(ApiError::InvalidArgument(
                "no feature levels requested".to_string(),
            ));
        }
        requested
            .iter()
            .copied()
            .filter(|level| *level <= self.adapter.feature_level)
            .max()
            .ok_or_else(|| {
                ApiError::Unsupported(format!(
                    "none of the requested feature levels (device maximum {})",
                    self.adapter.feature_level
                ))
            })
    }

    fn check_shader_model(&self, highest: ShaderModel) -> Result<ShaderModel, ApiError> {
        self.query()?;
        Ok(highest.min(self.adapter.shader_model))
    }

    fn check_root_signature_version(
        &self,
        highest: RootSignatureVersion,
    ) -> Result<RootSignatureVersion, ApiError> {
        self.query()?;
        Ok(highest.min(self.adapter.root_signature_version))
    }

    fn check_architecture(&self, node_index: u32) -> Result<ArchitectureInfo, ApiError> {
        self.query()?;
        if node_index != 0 {
            return Err(ApiError::InvalidArgument(format!(
                "node {node_index} does not exist on a single-node adapter"
            )));
        }
        Ok(self.adapter.architecture)
    }

    fn check_virtual_address_support(&self) -> Result<VirtualAddressSupport, ApiError> {
        self.query()?;
        Ok(self.adapter.virtual_address)
    }

    fn check_options(&self) -> Result<DeviceOptions, ApiError> {
        self.query()?;
        Ok(self.adapter.options)
    }

    fn check_wave_ops(&self) -> Result<WaveOpsInfo, ApiError> {
        self.query()?;
        self.adapter
            .wave_ops
            .ok_or_else(|| ApiError::Unsupported("wave operations".to_string()))
    }

    fn create_command_queue(
        &self,
        descriptor: &CommandQueueDescriptor,
    ) -> Result<HeadlessCommandQueue, ApiError> {
        self.tracked.shared().enter(Call::CreateCommandQueue)?;
        if descriptor.kind != CommandListType::Direct {
            return Err(ApiError::InvalidArgument(format!(
                "{} queues do not exist",
                descriptor.kind
            )));
        }
        Ok(HeadlessCommandQueue {
            tracked: self.track(ObjectKind::CommandQueue),
        })
    }

    fn create_command_allocator(
        &self,
        kind: CommandListType,
    ) -> Result<HeadlessCommandAllocator, ApiError> {
        self.tracked
            .shared()
            .enter(Call::CreateCommandAllocator(kind))?;
        Ok(HeadlessCommandAllocator {
            tracked: self.track(ObjectKind::CommandAllocator(kind)),
            record: Rc::new(AllocatorRecord {
                kind,
                last_submission: Cell::new(0),
            }),
        })
    }

    fn create_command_list(
        &self,
        kind: CommandListType,
        allocator: &HeadlessCommandAllocator,
        _initial_state: Option<&HeadlessPipelineState>,
    ) -> Result<HeadlessCommandList, ApiError> {
        self.tracked.shared().enter(Call::CreateCommandList(kind))?;
        if allocator.record.kind != kind {
            return Err(ApiError::InvalidArgument(format!(
                "{} allocator cannot back a {kind} list",
                allocator.record.kind
            )));
        }
        Ok(HeadlessCommandList {
            tracked: self.track(ObjectKind::CommandList(kind)),
            record: Rc::new(RefCell::new(ListRecord {
                kind,
                state: CommandListState::Open,
                commands: Vec::new(),
                allocator: Rc::clone(&allocator.record),
            })),
        })
    }

    fn create_descriptor_heap(
        &self,
        descriptor: &DescriptorHeapDescriptor,
    ) -> Result<HeadlessDescriptorHeap, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::CreateDescriptorHeap)?;
        if descriptor.num_descriptors == 0 {
            return Err(ApiError::InvalidArgument(
                "descriptor heap of zero descriptors".to_string(),
            ));
        }
        if descriptor.kind == DescriptorHeapType::RenderTargetView && descriptor.shader_visible {
            return Err(ApiError::InvalidArgument(
                "render target heaps cannot be shader visible".to_string(),
            ));
        }
        let tracked = self.track(ObjectKind::DescriptorHeap);
        let base = (tracked.id().0 as usize + 1) * DESCRIPTOR_HEAP_SPACING;
        if descriptor.kind == DescriptorHeapType::RenderTargetView {
            shared.state.borrow_mut().rtv_heaps.push((
                base,
                descriptor.num_descriptors,
                RTV_DESCRIPTOR_SIZE,
            ));
        }
        Ok(HeadlessDescriptorHeap { tracked, base })
    }

    fn descriptor_handle_increment_size(&self, kind: DescriptorHeapType) -> u32 {
        match kind {
            DescriptorHeapType::RenderTargetView => RTV_DESCRIPTOR_SIZE,
            DescriptorHeapType::CbvSrvUav => CBV_SRV_UAV_DESCRIPTOR_SIZE,
        }
    }

    fn create_render_target_view(
        &self,
        resource: &HeadlessResource,
        destination: CpuDescriptorHandle,
    ) -> Result<(), ApiError> {
        let shared = self.tracked.shared();
        let mut state = shared.state.borrow_mut();
        state.enter(Call::CreateRenderTargetView)?;
        if state.rtv_slot(destination.ptr).is_none() {
            return Err(ApiError::InvalidArgument(format!(
                "0x{:x} is not a render target descriptor",
                destination.ptr
            )));
        }
        state.rtv_bindings.insert(destination.ptr, resource.key);
        Ok(())
    }

    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Result<HeadlessRootSignature, ApiError> {
        self.tracked.shared().enter(Call::CreateRootSignature)?;
        if let Some(index) = descriptor
            .parameters
            .iter()
            .position(|parameter| parameter.num_values() == 0)
        {
            return Err(ApiError::InvalidArgument(format!(
                "root parameter {index} holds no values"
            )));
        }
        let parameters: Rc<[u32]> = descriptor
            .parameters
            .iter()
            .map(RootParameter::num_values)
            .collect();
        Ok(HeadlessRootSignature {
            tracked: self.track(ObjectKind::RootSignature),
            parameters,
            allows_input_layout: descriptor
                .flags
                .contains(RootSignatureFlags::ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT),
        })
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineDescriptor<'_, HeadlessRootSignature>,
    ) -> Result<HeadlessPipelineState, ApiError> {
        self.tracked.shared().enter(Call::CreatePipelineState)?;
        if descriptor.vertex_shader.stage() != ShaderStage::Vertex
            || descriptor.pixel_shader.stage() != ShaderStage::Pixel
        {
            return Err(ApiError::InvalidArgument(
                "shader bytecode bound to the wrong stage".to_string(),
            ));
        }
        if !descriptor.input_layout.is_empty() && !descriptor.root_signature.allows_input_layout {
            return Err(ApiError::InvalidArgument(
                "input layout used with a root signature that denies it".to_string(),
            ));
        }
        let targets = descriptor.render_target_formats.len();
        if targets == 0 || targets > MAX_RENDER_TARGETS {
            return Err(ApiError::InvalidArgument(format!(
                "{targets} render targets, expected 1 to {MAX_RENDER_TARGETS}"
            )));
        }
        if descriptor.sample_desc.count == 0 {
            return Err(ApiError::InvalidArgument("zero sample count".to_string()));
        }
        Ok(HeadlessPipelineState {
            tracked: self.track(ObjectKind::PipelineState),
        })
    }

    fn create_committed_buffer(
        &self,
        descriptor: &BufferDescriptor,
    ) -> Result<HeadlessResource, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::CreateCommittedResource)?;
        if descriptor.size == 0 {
            return Err(ApiError::InvalidArgument("zero-sized buffer".to_string()));
        }
        if descriptor.heap == HeapType::Upload
            && descriptor.initial_state != ResourceState::GenericRead
        {
            return Err(ApiError::InvalidArgument(format!(
                "upload heap buffers must start in {}, not {}",
                ResourceState::GenericRead,
                descriptor.initial_state
            )));
        }
        let key = shared
            .state
            .borrow_mut()
            .new_resource(descriptor.initial_state);
        HeadlessResource::buffer(
            self.track(ObjectKind::Buffer),
            key,
            descriptor.size,
            descriptor.heap,
        )
    }

    fn create_fence(&self, initial_value: u64) -> Result<HeadlessFence, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::CreateFence)?;
        let tracked = self.track(ObjectKind::Fence);
        shared
            .state
            .borrow_mut()
            .timeline
            .register_fence(tracked.id(), initial_value);
        Ok(HeadlessFence { tracked })
    }

    fn create_event(&self) -> Result<HeadlessEvent, ApiError> {
        self.tracked.shared().enter(Call::CreateEvent)?;
        Ok(HeadlessEvent {
            tracked: self.track(ObjectKind::Event),
        })
    }
}
