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

//! Implementations of the explicit graphics API contracts.
//!
//! - [`headless`]: a validating backend with no GPU and no window, used by the
//!   tests and the `--headless` mode of the demo.
//! - `d3d12`: the Direct3D 12 backend, only built on Windows.

#[cfg(windows)]
pub mod d3d12;
pub mod headless;
