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

//! Scripted failures for the headless backend.

use lumen_core::renderer::{ApiError, CommandListType};
use std::collections::HashMap;
use std::fmt;

/// One API entry point of the headless backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Call {
    EnumAdapter,
    CreateDevice,
    CheckFeatureSupport,
    CreateCommandQueue,
    CreateCommandAllocator(CommandListType),
    CreateCommandList(CommandListType),
    CreateSwapChain,
    CreateDescriptorHeap,
    GetBuffer,
    CreateRenderTargetView,
    CreateRootSignature,
    CreatePipelineState,
    CreateCommittedResource,
    Map,
    CreateFence,
    CreateEvent,
    ResetCommandAllocator,
    ResetCommandList(CommandListType),
    CloseCommandList(CommandListType),
    ExecuteCommandLists,
    Signal,
    SetEventOnCompletion,
    WaitForEvent,
    Present,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::CreateCommandAllocator(kind) => write!(f, "CreateCommandAllocator({kind})"),
            Call::CreateCommandList(kind) => write!(f, "CreateCommandList({kind})"),
            Call::ResetCommandList(kind) => write!(f, "ResetCommandList({kind})"),
            Call::CloseCommandList(kind) => write!(f, "CloseCommandList({kind})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A set of calls scheduled to fail.
///
/// Each entry fails the `nth` invocation of a call (counting from 1) with the given
/// error. Invocations before and after it succeed.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: HashMap<Call, (u32, ApiError)>,
}

impl FaultPlan {
    /// A plan with no failures.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fails the first invocation of `call`.
    pub fn fail(call: Call, error: ApiError) -> Self {
        Self::none().and_fail_nth(call, 1, error)
    }

    /// Adds a failure of the `nth` invocation of `call`.
    pub fn and_fail_nth(mut self, call: Call, nth: u32, error: ApiError) -> Self {
        self.faults.insert(call, (nth.max(1), error));
        self
    }

    /// Returns the error scheduled for invocation number `count` of `call`.
    pub(crate) fn check(&self, call: Call, count: u32) -> Result<(), ApiError> {
        match self.faults.get(&call) {
            Some((nth, error)) if *nth == count => {
                log::debug!("Injecting failure into {call} (invocation {count}): {error}");
                Err(error.clone())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_scheduled_invocation_fails() {
        let plan = FaultPlan::fail(Call::Present, ApiError::OutOfMemory)
            .and_fail_nth(Call::Signal, 3, ApiError::DeviceRemoved("hung".into()));

        assert_eq!(plan.check(Call::Present, 1), Err(ApiError::OutOfMemory));
        assert_eq!(plan.check(Call::Present, 2), Ok(()));
        assert_eq!(plan.check(Call::Signal, 2), Ok(()));
        assert!(plan.check(Call::Signal, 3).is_err());
        assert_eq!(plan.check(Call::CreateFence, 1), Ok(()));
    }
}
