//! Saved loader state
//!
//! When a loader is discarded, its properties can be snapshotted here and
//! handed back to the next loader attached to the same element. The store
//! only ever holds owned snapshots; retention decides how long they live.

use bones_core::ElementId;
use rustc_hash::FxHashMap;

use crate::properties::{BoneSnapshot, SkeletonSnapshot};

/// How long a snapshot is kept
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retention {
    /// Kept until taken
    Strong,
    /// Dropped by the next [`SavedStateStore::expire_transient`]
    Transient,
}

#[derive(Clone, Debug)]
pub enum SavedProperties {
    Skeleton(SkeletonSnapshot),
    Bone(BoneSnapshot),
}

#[derive(Debug)]
struct SavedEntry {
    properties: SavedProperties,
    retention: Retention,
}

#[derive(Debug, Default)]
pub struct SavedStateStore {
    entries: FxHashMap<ElementId, SavedEntry>,
}

impl SavedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a snapshot, replacing any earlier one for the element
    pub fn save(&mut self, id: ElementId, properties: SavedProperties, retention: Retention) {
        tracing::debug!(%id, ?retention, "saved loader state");
        self.entries.insert(id, SavedEntry { properties, retention });
    }

    pub fn take_skeleton(&mut self, id: ElementId) -> Option<SkeletonSnapshot> {
        if !matches!(self.entries.get(&id)?.properties, SavedProperties::Skeleton(_)) {
            return None;
        }
        match self.entries.remove(&id)?.properties {
            SavedProperties::Skeleton(snapshot) => Some(snapshot),
            SavedProperties::Bone(_) => None,
        }
    }

    pub fn take_bone(&mut self, id: ElementId) -> Option<BoneSnapshot> {
        if !matches!(self.entries.get(&id)?.properties, SavedProperties::Bone(_)) {
            return None;
        }
        match self.entries.remove(&id)?.properties {
            SavedProperties::Bone(snapshot) => Some(snapshot),
            SavedProperties::Skeleton(_) => None,
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn retention(&self, id: ElementId) -> Option<Retention> {
        self.entries.get(&id).map(|entry| entry.retention)
    }

    /// Drop every transient snapshot, returning how many went
    pub fn expire_transient(&mut self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.retention == Retention::Strong);
        before - self.entries.len()
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
