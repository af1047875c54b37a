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

//! Bookkeeping of every object the headless backend hands out.

use lumen_core::renderer::CommandListType;
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one created object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

/// What kind of object an [`ObjectId`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Factory,
    Adapter,
    Device,
    CommandQueue,
    CommandAllocator(CommandListType),
    CommandList(CommandListType),
    SwapChain,
    /// A reference to one swap-chain buffer.
    BackBuffer(u32),
    DescriptorHeap,
    RootSignature,
    PipelineState,
    Buffer,
    Fence,
    Event,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::CommandAllocator(kind) => write!(f, "{kind} command allocator"),
            ObjectKind::CommandList(kind) => write!(f, "{kind} command list"),
            ObjectKind::BackBuffer(index) => write!(f, "back buffer {index}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Live objects plus the full history of creations and releases.
#[derive(Debug, Default)]
pub struct ObjectTracker {
    next_id: u64,
    live: BTreeMap<ObjectId, ObjectKind>,
    created: Vec<(ObjectId, ObjectKind)>,
    released: Vec<(ObjectId, ObjectKind)>,
    double_releases: Vec<ObjectId>,
}

impl ObjectTracker {
    /// Registers a new live object.
    pub fn create(&mut self, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, kind);
        self.created.push((id, kind));
        log::trace!("Created {} #{}", kind, id.0);
        id
    }

    /// Marks `id` released. Releasing an object that is not live is recorded as a
    /// double release.
    pub fn release(&mut self, id: ObjectId) {
        match self.live.remove(&id) {
            Some(kind) => {
                log::trace!("Released {} #{}", kind, id.0);
                self.released.push((id, kind));
            }
            None => {
                log::error!("Object #{} released twice", id.0);
                self.double_releases.push(id);
            }
        }
    }

    /// Objects not yet released.
    pub fn live(&self) -> impl Iterator<Item = (ObjectId, ObjectKind)> + '_ {
        self.live.iter().map(|(id, kind)| (*id, *kind))
    }

    /// Every object ever created, in creation order.
    pub fn created(&self) -> &[(ObjectId, ObjectKind)] {
        &self.created
    }

    /// Every release, in order.
    pub fn released(&self) -> &[(ObjectId, ObjectKind)] {
        &self.released
    }

    /// Ids released while not live.
    pub fn double_releases(&self) -> &[ObjectId] {
        &self.double_releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_are_recorded_in_order() {
        let mut tracker = ObjectTracker::default();
        let device = tracker.create(ObjectKind::Device);
        let fence = tracker.create(ObjectKind::Fence);

        tracker.release(fence);
        tracker.release(device);

        assert_eq!(tracker.live().count(), 0);
        let kinds: Vec<_> = tracker.released().iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![ObjectKind::Fence, ObjectKind::Device]);
        assert!(tracker.double_releases().is_empty());
    }

    #[test]
    fn second_release_is_flagged() {
        let mut tracker = ObjectTracker::default();
        let event = tracker.create(ObjectKind::Event);
        tracker.release(event);
        tracker.release(event);
        assert_eq!(tracker.double_releases(), &[event]);
    }
}
