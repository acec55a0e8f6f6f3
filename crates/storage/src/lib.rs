//! The accumulated flat list of comment records for one board.
//!
//! Pages are appended as they arrive; single-comment changes are patched in place by id.
//! Nothing here outlives the process.

use domain::{CommentId, CommentRecord};
use std::collections::HashMap;

mod repo;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<CommentRecord>,
    index: HashMap<CommentId, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn get(&self, id: CommentId) -> Option<&CommentRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.index.contains_key(&id)
    }
}
