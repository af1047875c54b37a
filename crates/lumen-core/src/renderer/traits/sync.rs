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

use super::Api;
use crate::renderer::error::ApiError;

/// A counter the GPU signals and the CPU waits on.
pub trait Fence<A: Api> {
    /// The last value the GPU has completed.
    fn completed_value(&self) -> u64;

    /// Arms `event` to fire once the fence reaches `value`.
    fn set_event_on_completion(&self, value: u64, event: &A::Event) -> Result<(), ApiError>;
}

/// A waitable OS event.
pub trait Event {
    /// Blocks until the event fires. There is no timeout.
    fn wait(&self) -> Result<(), ApiError>;
}
