use crate::RecordStore;
use domain::{CommentId, CommentRecord};

impl RecordStore {
    fn get_mut(&mut self, id: CommentId) -> Option<&mut CommentRecord> {
        let idx = *self.index.get(&id)?;
        self.records.get_mut(idx)
    }

    /// Rewrites a comment body after an edit. Returns false if the comment is not loaded.
    pub fn patch_body(&mut self, id: CommentId, body: String) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.body = body;
                true
            }
            None => false,
        }
    }

    /// Stores the settled like state of a comment.
    pub fn patch_engagement(&mut self, id: CommentId, liked: bool, count: u32) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.is_liked_by_viewer = liked;
                record.like_count = count;
                true
            }
            None => false,
        }
    }
}
