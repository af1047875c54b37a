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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! [`ApiError`] is the failure of a single graphics API call as reported by a
//! backend. [`RenderError`] is what the render protocol reports to its caller: it
//! names the setup stage or per-frame step that failed and carries the
//! [`ApiError`] that caused it.

use crate::renderer::api::capabilities::CapabilityQuery;
use crate::renderer::api::command::{CommandListState, CommandListType};
use thiserror::Error;

/// The failure of one explicit graphics API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A parameter passed to the call was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The device or the host ran out of memory.
    #[error("out of memory")]
    OutOfMemory,
    /// The device was removed or reset by the driver.
    #[error("device removed: {0}")]
    DeviceRemoved(String),
    /// The requested object (adapter, buffer index, ...) does not exist.
    #[error("not found")]
    NotFound,
    /// The operation or feature is not supported by this device.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// The call was made while the object was in a state that forbids it.
    #[error("invalid call: {0}")]
    InvalidCall(String),
    /// Waiting on an OS event failed.
    #[error("wait failed: {0}")]
    WaitFailed(String),
    /// Any other backend-specific failure code.
    #[error("backend error 0x{code:08X}: {message}")]
    Backend {
        /// The raw result code reported by the backend.
        code: i32,
        /// A human readable description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns `true` for the failure class caused by the caller passing a malformed
    /// parameter, as opposed to the device lacking the queried feature.
    pub fn is_malformed_parameter(&self) -> bool {
        matches!(self, ApiError::InvalidArgument(_))
    }
}

/// A high-level error reported by the render protocol.
///
/// Every setup stage has its own variant so the caller can tell which stage
/// aborted. The per-frame variants are grouped at the end; see
/// [`RenderError::is_setup_failure`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// Adapter enumeration found no adapter at all.
    #[error("no Direct3D capable adapters were found on the current platform")]
    NoAdapters,
    /// The logical device could not be created on the chosen adapter.
    #[error("failed to create the logical device on adapter {adapter_index}: {source}")]
    DeviceCreationFailed {
        /// Index of the adapter the device was requested on.
        adapter_index: usize,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },
    /// A capability query failed because of a malformed parameter.
    #[error("capability query `{query}` failed: {source}")]
    CapabilityQueryFailed {
        /// The query that failed.
        query: CapabilityQuery,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },
    /// The direct command queue could not be created.
    #[error("failed to create the command queue: {0}")]
    CommandQueueCreationFailed(#[source] ApiError),
    /// A command allocator could not be created.
    #[error("failed to create the {kind} command allocator: {source}")]
    CommandAllocatorCreationFailed {
        /// The kind of list the allocator was meant for.
        kind: CommandListType,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },
    /// The swap chain could not be created.
    #[error("failed to create the swap chain: {0}")]
    SwapChainCreationFailed(#[source] ApiError),
    /// The render-target descriptor heap could not be created.
    #[error("failed to create the render target descriptor heap: {0}")]
    DescriptorHeapCreationFailed(#[source] ApiError),
    /// A back buffer could not be fetched to build its render-target view.
    #[error("failed to create the render target view for back buffer {index}: {source}")]
    RenderTargetViewFailed {
        /// The back-buffer index.
        index: u32,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },
    /// The root signature could not be serialized or created.
    #[error("failed to create the root signature: {0}")]
    RootSignatureCreationFailed(#[source] ApiError),
    /// The graphics pipeline state object could not be created.
    #[error("failed to create the graphics pipeline state: {0}")]
    PipelineStateCreationFailed(#[source] ApiError),
    /// A command list or bundle could not be created or initially closed.
    #[error("failed to create the {kind} command list: {source}")]
    CommandListCreationFailed {
        /// The kind of list that failed.
        kind: CommandListType,
        /// The underlying API failure.
        #[source]
        source: ApiError,
    },
    /// The fence or its waitable event could not be created.
    #[error("failed to create the frame fence: {0}")]
    FenceCreationFailed(#[source] ApiError),
    /// The vertex buffer could not be created, mapped or recorded into the bundle.
    #[error("failed to create the vertex buffer: {0}")]
    VertexBufferFailed(#[source] ApiError),
    /// Compiled shader bytecode was missing, unreadable or empty.
    #[error("failed to load compiled shader object `{path}`: {reason}")]
    ShaderLoadFailed {
        /// The path (or label) of the shader that failed to load.
        path: String,
        /// Why it failed.
        reason: String,
    },
    /// The render configuration is not usable.
    #[error("invalid render configuration: {0}")]
    InvalidConfiguration(String),
    /// The native window handle could not be obtained.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// Resetting or closing a command list or allocator failed during recording.
    #[error("command recording failed: {0}")]
    RecordingFailed(#[source] ApiError),
    /// A command list was driven out of its open/closed/submitted order.
    #[error("command list is {found}, expected {expected}")]
    InvalidCommandListState {
        /// The state the operation requires.
        expected: CommandListState,
        /// The state the list was actually in.
        found: CommandListState,
    },
    /// Executing the closed command list on the queue failed.
    #[error("command submission failed: {0}")]
    SubmissionFailed(#[source] ApiError),
    /// Presenting the swap chain failed.
    #[error("present failed: {0}")]
    PresentFailed(#[source] ApiError),
    /// Signaling or waiting on the frame fence failed.
    #[error("frame synchronization failed: {0}")]
    SynchronizationFailed(#[source] ApiError),
}

impl RenderError {
    /// Returns `true` when the error aborted a setup stage, `false` when it came from
    /// recording, submitting, presenting or pacing a frame.
    pub fn is_setup_failure(&self) -> bool {
        !matches!(
            self,
            RenderError::RecordingFailed(_)
                | RenderError::InvalidCommandListState { .. }
                | RenderError::SubmissionFailed(_)
                | RenderError::PresentFailed(_)
                | RenderError::SynchronizationFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Backend {
            code: 0x887A0005u32 as i32,
            message: "device hung".to_string(),
        };
        assert_eq!(format!("{err}"), "backend error 0x887A0005: device hung");
        assert_eq!(format!("{}", ApiError::OutOfMemory), "out of memory");
    }

    #[test]
    fn only_invalid_argument_is_malformed() {
        assert!(ApiError::InvalidArgument("size".into()).is_malformed_parameter());
        assert!(!ApiError::Unsupported("wave ops".into()).is_malformed_parameter());
        assert!(!ApiError::NotFound.is_malformed_parameter());
    }

    #[test]
    fn render_error_wraps_api_error_as_source() {
        let err = RenderError::DeviceCreationFailed {
            adapter_index: 2,
            source: ApiError::Unsupported("feature level 12.0".into()),
        };
        assert_eq!(
            format!("{err}"),
            "failed to create the logical device on adapter 2: unsupported: feature level 12.0"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn setup_and_frame_failures_are_distinguished() {
        assert!(RenderError::NoAdapters.is_setup_failure());
        assert!(RenderError::VertexBufferFailed(ApiError::OutOfMemory).is_setup_failure());
        assert!(!RenderError::PresentFailed(ApiError::DeviceRemoved("hung".into()))
            .is_setup_failure());
        assert!(!RenderError::InvalidCommandListState {
            expected: CommandListState::Closed,
            found: CommandListState::Open,
        }
        .is_setup_failure());
    }
}
