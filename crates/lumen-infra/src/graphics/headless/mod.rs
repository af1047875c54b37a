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

//! A validating, window-less implementation of the explicit graphics API.
//!
//! Nothing is rendered. Every object is tracked so its release can be checked,
//! command lists are replayed against simulated resource states, and the GPU is
//! simulated as a timeline that only advances when the CPU waits on an event.
//! Individual calls can be scripted to fail with a [`FaultPlan`].

mod command;
mod config;
mod device;
mod factory;
mod fault;
mod inspector;
mod resource;
mod state;
mod sync;
mod tracker;

pub use self::command::{HeadlessCommandAllocator, HeadlessCommandList, HeadlessCommandQueue};
pub use self::config::{HeadlessAdapterDesc, HeadlessConfig};
pub use self::device::HeadlessDevice;
pub use self::factory::{HeadlessAdapter, HeadlessFactory};
pub use self::fault::{Call, FaultPlan};
pub use self::inspector::HeadlessInspector;
pub use self::resource::{
    HeadlessDescriptorHeap, HeadlessPipelineState, HeadlessResource, HeadlessRootSignature,
    HeadlessSwapChain, MAX_SYNC_INTERVAL,
};
pub use self::state::{BarrierRecord, FrameLog, ResourceKey};
pub use self::sync::{HeadlessEvent, HeadlessFence};
pub use self::tracker::{ObjectId, ObjectKind};

use lumen_core::renderer::Api;

/// The headless backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Api for Headless {
    const NAME: &'static str = "headless";

    type Factory = HeadlessFactory;
    type Adapter = HeadlessAdapter;
    type Device = HeadlessDevice;
    type CommandQueue = HeadlessCommandQueue;
    type CommandAllocator = HeadlessCommandAllocator;
    type CommandList = HeadlessCommandList;
    type SwapChain = HeadlessSwapChain;
    type DescriptorHeap = HeadlessDescriptorHeap;
    type Resource = HeadlessResource;
    type RootSignature = HeadlessRootSignature;
    type PipelineState = HeadlessPipelineState;
    type Fence = HeadlessFence;
    type Event = HeadlessEvent;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::*;

    fn device(factory: &HeadlessFactory) -> HeadlessDevice {
        let adapter = factory.enum_adapter(0).unwrap();
        factory
            .create_device(&adapter, FeatureLevel::DEVICE_FLOOR)
            .unwrap()
    }

    #[test]
    fn enumeration_ends_with_not_found() {
        let factory = HeadlessFactory::default();
        assert!(factory.enum_adapter(0).is_ok());
        assert!(factory.enum_adapter(1).is_ok());
        assert_eq!(factory.enum_adapter(2).err(), Some(ApiError::NotFound));
    }

    #[test]
    fn device_creation_respects_the_minimum_feature_level() {
        let factory = HeadlessFactory::new(HeadlessConfig::with_adapters(vec![
            HeadlessAdapterDesc::hardware("Old GPU", FeatureLevel::Level11_0),
        ]));
        let adapter = factory.enum_adapter(0).unwrap();
        let result = factory.create_device(&adapter, FeatureLevel::Level12_0);
        assert!(matches!(result, Err(ApiError::Unsupported(_))));
    }

    #[test]
    fn feature_level_query_picks_the_highest_supported() {
        let factory = HeadlessFactory::default();
        let device = device(&factory);
        assert_eq!(
            device.check_feature_levels(&FeatureLevel::QUERIED),
            Ok(FeatureLevel::Level12_1)
        );
        assert!(device.check_feature_levels(&[]).unwrap_err().is_malformed_parameter());
        assert!(matches!(
            device.check_feature_levels(&[FeatureLevel::Level12_2]),
            Err(ApiError::Unsupported(_))
        ));
    }

    #[test]
    fn software_adapter_lacks_wave_ops() {
        let factory = HeadlessFactory::default();
        let adapter = factory.enum_adapter(1).unwrap();
        assert!(adapter.info().is_software);
        let device = factory
            .create_device(&adapter, FeatureLevel::DEVICE_FLOOR)
            .unwrap();
        assert!(matches!(device.check_wave_ops(), Err(ApiError::Unsupported(_))));
    }

    #[test]
    fn bundles_reject_output_merger_commands() {
        let factory = HeadlessFactory::default();
        let device = device(&factory);
        let allocator = device
            .create_command_allocator(CommandListType::Bundle)
            .unwrap();
        let mut bundle = device
            .create_command_list(CommandListType::Bundle, &allocator, None)
            .unwrap();

        bundle.set_viewports(&[Viewport::full(8, 8)]);
        bundle.set_primitive_topology(PrimitiveTopology::TriangleStrip);

        assert_eq!(bundle.recorded_commands(), 1);
        let messages = factory.inspector().validation_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("RSSetViewports"));
    }

    #[test]
    fn lists_follow_the_open_closed_submitted_cycle() {
        let factory = HeadlessFactory::default();
        let device = device(&factory);
        let queue = device
            .create_command_queue(&CommandQueueDescriptor::default())
            .unwrap();
        let allocator = device
            .create_command_allocator(CommandListType::Direct)
            .unwrap();
        let mut list = device
            .create_command_list(CommandListType::Direct, &allocator, None)
            .unwrap();

        assert!(queue.execute_command_lists(&[&list]).is_err());
        assert!(matches!(
            list.reset(&allocator, None),
            Err(ApiError::InvalidCall(_))
        ));
        list.close().unwrap();
        assert!(matches!(list.close(), Err(ApiError::InvalidCall(_))));
        queue.execute_command_lists(&[&list]).unwrap();

        // The submission has not retired, so the allocator is still in use.
        assert!(allocator.reset().is_err());

        let fence = device.create_fence(0).unwrap();
        let event = device.create_event().unwrap();
        queue.signal(&fence, 1).unwrap();
        fence.set_event_on_completion(1, &event).unwrap();
        event.wait().unwrap();
        assert_eq!(fence.completed_value(), 1);
        assert!(allocator.reset().is_ok());
        assert!(list.reset(&allocator, None).is_ok());
    }

    #[test]
    fn upload_buffers_map_and_hold_data() {
        let factory = HeadlessFactory::default();
        let device = device(&factory);
        let buffer = device
            .create_committed_buffer(&BufferDescriptor::upload(16))
            .unwrap();
        assert_ne!(buffer.gpu_virtual_address(), 0);

        unsafe {
            let ptr = buffer.map(0, Some(0..0)).unwrap();
            ptr.as_ptr().write_bytes(0xAB, 16);
            buffer.unmap(0, None);
            let ptr = buffer.map(0, None).unwrap();
            assert_eq!(*ptr.as_ptr().add(15), 0xAB);
            buffer.unmap(0, Some(0..0));
        }
        assert!(factory.inspector().validation_messages().is_empty());
        assert!(device
            .create_committed_buffer(&BufferDescriptor::upload(0))
            .is_err());
    }

    #[test]
    fn dropping_objects_releases_them() {
        let factory = HeadlessFactory::default();
        let inspector = factory.inspector();
        {
            let device = device(&factory);
            let _fence = device.create_fence(0).unwrap();
            assert_eq!(inspector.live_count(), 3);
        }
        drop(factory);
        assert_eq!(inspector.live_count(), 0);
        assert_eq!(inspector.double_release_count(), 0);
        assert_eq!(
            inspector.release_order(),
            vec![
                ObjectKind::Adapter,
                ObjectKind::Fence,
                ObjectKind::Device,
                ObjectKind::Factory
            ]
        );
    }

    #[test]
    fn scripted_faults_fail_the_named_call() {
        let factory = HeadlessFactory::with_faults(
            HeadlessConfig::default(),
            FaultPlan::fail(Call::CreateFence, ApiError::OutOfMemory),
        );
        let device = device(&factory);
        assert_eq!(device.create_fence(0).err(), Some(ApiError::OutOfMemory));
        assert!(device.create_fence(0).is_ok());
        assert_eq!(factory.inspector().call_count(Call::CreateFence), 2);
    }
}
