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

//! Adapter information and adapter selection.

/// The maximum number of adapters enumerated at startup.
pub const MAX_ADAPTER_COUNT: usize = 16;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Provides standardized, backend-agnostic information about a graphics adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterInfo {
    /// The description of the adapter (e.g., "NVIDIA GeForce RTX 4090").
    pub description: String,
    /// Video memory dedicated to the adapter, in bytes.
    pub dedicated_video_memory: u64,
    /// System memory dedicated to the adapter, in bytes.
    pub dedicated_system_memory: u64,
    /// System memory the adapter can share with the CPU, in bytes.
    pub shared_system_memory: u64,
    /// `true` for software rasterizers such as WARP.
    pub is_software: bool,
}

impl AdapterInfo {
    /// Dedicated video memory in GiB.
    pub fn dedicated_video_memory_gib(&self) -> f64 {
        self.dedicated_video_memory as f64 / BYTES_PER_GIB
    }

    /// Dedicated system memory in GiB.
    pub fn dedicated_system_memory_gib(&self) -> f64 {
        self.dedicated_system_memory as f64 / BYTES_PER_GIB
    }

    /// Shared system memory in GiB.
    pub fn shared_system_memory_gib(&self) -> f64 {
        self.shared_system_memory as f64 / BYTES_PER_GIB
    }
}

/// The external source of the one-time adapter choice.
///
/// The selector sees the enumerated adapters and returns the raw index the user
/// asked for. `None` means no numeric choice was made. Range checking and the
/// fallback to adapter 0 are done by the caller.
pub trait AdapterSelector {
    /// Picks an adapter among `adapters`.
    fn select(&mut self, adapters: &[AdapterInfo]) -> Option<i64>;
}

impl<F> AdapterSelector for F
where
    F: FnMut(&[AdapterInfo]) -> Option<i64>,
{
    fn select(&mut self, adapters: &[AdapterInfo]) -> Option<i64> {
        self(adapters)
    }
}

/// Always requests the same adapter index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAdapter(pub usize);

impl AdapterSelector for FixedAdapter {
    fn select(&mut self, _adapters: &[AdapterInfo]) -> Option<i64> {
        i64::try_from(self.0).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sizes_are_reported_in_gib() {
        let info = AdapterInfo {
            description: "Test".to_string(),
            dedicated_video_memory: 8 * 1024 * 1024 * 1024,
            dedicated_system_memory: 0,
            shared_system_memory: 3 * 512 * 1024 * 1024,
            is_software: false,
        };
        assert_eq!(info.dedicated_video_memory_gib(), 8.0);
        assert_eq!(info.dedicated_system_memory_gib(), 0.0);
        assert_eq!(info.shared_system_memory_gib(), 1.5);
    }

    #[test]
    fn closures_and_fixed_indices_select_adapters() {
        let adapters = vec![AdapterInfo::default(); 3];
        let mut last = |list: &[AdapterInfo]| Some(list.len() as i64 - 1);
        assert_eq!(last.select(&adapters), Some(2));
        assert_eq!(FixedAdapter(1).select(&adapters), Some(1));
    }
}
