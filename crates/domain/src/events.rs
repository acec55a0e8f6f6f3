use crate::models::{BoardKey, CommentId, EngagementState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SectionEvent {
    TreeRefreshed {
        board: BoardKey,
        roots: usize,
        loaded: usize,
    },
    TotalCount {
        board: BoardKey,
        total: u64,
    },
    EngagementChanged {
        comment_id: CommentId,
        state: EngagementState,
    },
    Notice {
        message: String,
    },
}
