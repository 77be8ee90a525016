use crate::models::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pending writes and pending deletions for one kind of record.
///
/// Both sides are sets: repeated edits of the same record coalesce into a
/// single write at flush time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtySet {
    dirty: BTreeSet<RecordId>,
    deleted: BTreeSet<RecordId>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self, id: &RecordId) {
        self.dirty.insert(id.clone());
    }

    /// Durable ids are queued for deletion. A temporary id was never
    /// persisted, so forgetting its pending write is all there is to do.
    pub fn mark_deleted(&mut self, id: &RecordId) {
        self.dirty.remove(id);
        if id.is_durable() {
            self.deleted.insert(id.clone());
        }
    }

    pub fn is_dirty(&self, id: &RecordId) -> bool {
        self.dirty.contains(id)
    }

    pub fn is_deleted(&self, id: &RecordId) -> bool {
        self.deleted.contains(id)
    }

    /// Anything waiting for a flush.
    pub fn is_pending(&self) -> bool {
        !self.dirty.is_empty() || !self.deleted.is_empty()
    }

    pub fn dirty(&self) -> impl Iterator<Item = &RecordId> {
        self.dirty.iter()
    }

    pub fn deleted(&self) -> impl Iterator<Item = &RecordId> {
        self.deleted.iter()
    }

    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    pub fn deleted_len(&self) -> usize {
        self.deleted.len()
    }

    /// A write reached the backend.
    pub fn clear_dirty(&mut self, id: &RecordId) {
        self.dirty.remove(id);
    }

    /// A deletion reached the backend.
    pub fn clear_deleted(&mut self, id: &RecordId) {
        self.deleted.remove(id);
    }

    /// Carry a pending write over to the canonical id the backend assigned.
    pub fn remap(&mut self, old: &RecordId, new: &RecordId) {
        if self.dirty.remove(old) {
            self.dirty.insert(new.clone());
        }
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
        self.deleted.clear();
    }
}
