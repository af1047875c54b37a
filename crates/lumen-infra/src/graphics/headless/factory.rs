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

use super::command::HeadlessCommandQueue;
use super::config::{HeadlessAdapterDesc, HeadlessConfig};
use super::device::HeadlessDevice;
use super::fault::{Call, FaultPlan};
use super::inspector::HeadlessInspector;
use super::resource::HeadlessSwapChain;
use super::state::{Shared, TrackedObject};
use super::tracker::ObjectKind;
use super::Headless;
use lumen_core::renderer::{
    Adapter, AdapterInfo, ApiError, Factory, FeatureLevel, ResourceState, SwapChainDescriptor,
    MAX_FRAME_COUNT, MIN_FRAME_COUNT,
};
use raw_window_handle::RawWindowHandle;
use std::cell::Cell;
use std::rc::Rc;

/// Entry point of the headless backend.
///
/// Every object created through the factory shares its state, so the
/// [`HeadlessInspector`] obtained from it sees the whole object graph.
#[derive(Debug)]
pub struct HeadlessFactory {
    tracked: TrackedObject,
}

impl HeadlessFactory {
    /// A factory over `config` with no scripted failures.
    pub fn new(config: HeadlessConfig) -> Self {
        Self::with_faults(config, FaultPlan::none())
    }

    /// A factory over `config` failing the calls named in `faults`.
    pub fn with_faults(config: HeadlessConfig, faults: FaultPlan) -> Self {
        let shared = Shared::new(config, faults);
        log::debug!(
            "Headless factory exposing {} adapter(s)",
            shared.config.adapters.len()
        );
        Self {
            tracked: shared.track(ObjectKind::Factory),
        }
    }

    /// A read-only view of the state shared by everything this factory created.
    pub fn inspector(&self) -> HeadlessInspector {
        HeadlessInspector::new(Rc::clone(self.tracked.shared()))
    }
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

/// One configured adapter.
#[derive(Debug)]
pub struct HeadlessAdapter {
    #[allow(dead_code)]
    tracked: TrackedObject,
    desc: HeadlessAdapterDesc,
}

impl Adapter for HeadlessAdapter {
    fn info(&self) -> AdapterInfo {
        self.desc.info.clone()
    }
}

impl Factory<Headless> for HeadlessFactory {
    fn enum_adapter(&self, index: u32) -> Result<HeadlessAdapter, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::EnumAdapter)?;
        let desc = shared
            .config
            .adapters
            .get(index as usize)
            .cloned()
            .ok_or(ApiError::NotFound)?;
        Ok(HeadlessAdapter {
            tracked: shared.track(ObjectKind::Adapter),
            desc,
        })
    }

    fn create_device(
        &self,
        adapter: &HeadlessAdapter,
        minimum_feature_level: FeatureLevel,
    ) -> Result<HeadlessDevice, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::CreateDevice)?;
        if adapter.desc.feature_level < minimum_feature_level {
            return Err(ApiError::Unsupported(format!(
                "{} supports feature level {}, {} required",
                adapter.desc.info.description, adapter.desc.feature_level, minimum_feature_level
            )));
        }
        Ok(HeadlessDevice {
            tracked: shared.track(ObjectKind::Device),
            adapter: adapter.desc.clone(),
        })
    }

    fn create_swap_chain(
        &self,
        _queue: &HeadlessCommandQueue,
        _window: RawWindowHandle,
        descriptor: &SwapChainDescriptor,
    ) -> Result<HeadlessSwapChain, ApiError> {
        let shared = self.tracked.shared();
        shared.enter(Call::CreateSwapChain)?;
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ApiError::InvalidArgument(format!(
                "swap chain of {}x{} pixels",
                descriptor.width, descriptor.height
            )));
        }
        if !(MIN_FRAME_COUNT..=MAX_FRAME_COUNT).contains(&descriptor.buffer_count) {
            return Err(ApiError::InvalidArgument(format!(
                "flip-model swap chains need {MIN_FRAME_COUNT} to {MAX_FRAME_COUNT} buffers, got {}",
                descriptor.buffer_count
            )));
        }
        let tracked = shared.track(ObjectKind::SwapChain);
        let buffers = {
            let mut state = shared.state.borrow_mut();
            (0..descriptor.buffer_count)
                .map(|_| state.new_resource(ResourceState::Present))
                .collect()
        };
        let buffer_size = u64::from(descriptor.width)
            * u64::from(descriptor.height)
            * u64::from(descriptor.format.bytes_per_element());
        Ok(HeadlessSwapChain {
            tracked,
            buffers,
            buffer_size,
            current: Cell::new(0),
        })
    }
}
