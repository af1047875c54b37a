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

use lumen_core::renderer::ApiError;
use windows::Win32::Foundation::{E_INVALIDARG, E_NOTIMPL, E_OUTOFMEMORY};
use windows::Win32::Graphics::Dxgi::{
    DXGI_ERROR_DEVICE_HUNG, DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET,
    DXGI_ERROR_INVALID_CALL, DXGI_ERROR_NOT_FOUND, DXGI_ERROR_UNSUPPORTED,
};

/// Classifies a failed HRESULT.
pub(crate) fn api_error(error: windows::core::Error) -> ApiError {
    let code = error.code();
    let message = error.message().to_string();
    match code {
        E_INVALIDARG => ApiError::InvalidArgument(message),
        E_OUTOFMEMORY => ApiError::OutOfMemory,
        E_NOTIMPL | DXGI_ERROR_UNSUPPORTED => ApiError::Unsupported(message),
        DXGI_ERROR_NOT_FOUND => ApiError::NotFound,
        DXGI_ERROR_INVALID_CALL => ApiError::InvalidCall(message),
        DXGI_ERROR_DEVICE_REMOVED | DXGI_ERROR_DEVICE_HUNG | DXGI_ERROR_DEVICE_RESET => {
            ApiError::DeviceRemoved(message)
        }
        _ => ApiError::Backend {
            code: code.0,
            message,
        },
    }
}

/// Shorthand for mapping a `windows` result into the backend-agnostic error.
pub(crate) trait OrApiError<T> {
    fn or_api_error(self) -> Result<T, ApiError>;
}

impl<T> OrApiError<T> for windows::core::Result<T> {
    fn or_api_error(self) -> Result<T, ApiError> {
        self.map_err(api_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_class() {
        assert!(api_error(E_INVALIDARG.into()).is_malformed_parameter());
        assert_eq!(api_error(DXGI_ERROR_NOT_FOUND.into()), ApiError::NotFound);
        assert!(matches!(
            api_error(DXGI_ERROR_DEVICE_REMOVED.into()),
            ApiError::DeviceRemoved(_)
        ));
    }
}
