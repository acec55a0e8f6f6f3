use crate::RecordStore;
use domain::CommentRecord;
use tracing::debug;

impl RecordStore {
    /// Drops everything. Used when a board is (re)loaded from its first page.
    pub fn reset(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Replaces the contents with a first page.
    pub fn replace(&mut self, records: Vec<CommentRecord>) -> usize {
        self.reset();
        self.append(records)
    }

    /// Appends a page, skipping ids that are already loaded. Returns how many were added.
    pub fn append(&mut self, records: Vec<CommentRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.index.contains_key(&record.id) {
                debug!("Skipping already loaded comment {}", record.id);
                continue;
            }
            self.index.insert(record.id, self.records.len());
            self.records.push(record);
            added += 1;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::record;
    use crate::RecordStore;
    use domain::CommentId;
    use std::collections::HashSet;

    #[test]
    fn test_append_keeps_order_and_skips_duplicates() {
        let mut store = RecordStore::new();
        assert_eq!(store.append(vec![record(1, None), record(2, Some(1))]), 2);
        assert_eq!(store.append(vec![record(2, Some(1)), record(3, None)]), 1);

        let ids: Vec<i64> = store.records().iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), store.len());
    }

    #[test]
    fn test_replace_discards_previous_pages() {
        let mut store = RecordStore::new();
        store.append(vec![record(1, None), record(2, None)]);
        store.replace(vec![record(5, None)]);
        assert_eq!(store.len(), 1);
        assert!(store.contains(CommentId::new(5)));
        assert!(!store.contains(CommentId::new(1)));
        assert_eq!(store.get(CommentId::new(5)).map(|r| r.id.get()), Some(5));
    }
}
