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

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use lumen_core::renderer::{
    CommandListType, FixedAdapter, InMemoryShaderSource, RenderConfig, RenderError,
};
use lumen_infra::graphics::headless::{
    FaultPlan, Headless, HeadlessConfig, HeadlessFactory, HeadlessInspector, ObjectKind,
};
use lumen_infra::platform::window::HeadlessWindow;
use lumen_render::RenderContext;

pub const FRAME_COUNT: u32 = 5;

/// DXBC-tagged placeholder bytecode for both stages.
pub fn shaders() -> InMemoryShaderSource {
    InMemoryShaderSource::new(
        b"DXBC-vertex".to_vec(),
        b"DXBC-pixel".to_vec(),
    )
}

pub fn config() -> RenderConfig {
    RenderConfig {
        frame_count: FRAME_COUNT,
        enable_debug_layer: false,
        adapter_index: Some(0),
        ..RenderConfig::default()
    }
}

/// Builds a context on a fresh headless factory. The inspector stays valid after
/// the context, and the factory inside it, are gone.
pub fn build(
    headless: HeadlessConfig,
    faults: FaultPlan,
    adapter: usize,
) -> (Result<RenderContext<Headless>, RenderError>, HeadlessInspector) {
    let factory = HeadlessFactory::with_faults(headless, faults);
    let inspector = factory.inspector();
    let config = config();
    let window = HeadlessWindow::new(config.width, config.height);
    let context = RenderContext::<Headless>::new(
        factory,
        &window,
        &config,
        &mut FixedAdapter(adapter),
        &shaders(),
    );
    (context, inspector)
}

/// Position of `kind` in the teardown order. Lower ranks are released first.
pub fn teardown_rank(kind: ObjectKind) -> u32 {
    match kind {
        ObjectKind::Event => 0,
        ObjectKind::Fence => 1,
        ObjectKind::Buffer => 2,
        ObjectKind::CommandList(CommandListType::Bundle) => 3,
        ObjectKind::CommandList(_) => 4,
        ObjectKind::PipelineState => 5,
        ObjectKind::RootSignature => 6,
        ObjectKind::BackBuffer(index) => 10 + index,
        ObjectKind::DescriptorHeap => 100,
        ObjectKind::SwapChain => 101,
        ObjectKind::CommandQueue => 102,
        ObjectKind::CommandAllocator(CommandListType::Bundle) => 103,
        ObjectKind::CommandAllocator(_) => 104,
        ObjectKind::Device => 105,
        ObjectKind::Factory => 106,
        ObjectKind::Adapter => u32::MAX,
    }
}

/// Asserts nothing leaked, nothing was released twice and everything but the
/// adapters went in teardown order.
pub fn assert_clean_teardown(inspector: &HeadlessInspector) {
    assert_eq!(
        inspector.live_objects(),
        Vec::<ObjectKind>::new(),
        "objects leaked"
    );
    assert_eq!(inspector.double_release_count(), 0, "objects released twice");

    let ranks: Vec<u32> = inspector
        .release_order()
        .into_iter()
        .filter(|kind| *kind != ObjectKind::Adapter)
        .map(teardown_rank)
        .collect();
    assert!(
        ranks.windows(2).all(|pair| pair[0] < pair[1]),
        "release order out of teardown order: {:?}",
        inspector.release_order()
    );
}
