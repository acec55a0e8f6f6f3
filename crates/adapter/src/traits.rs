use async_trait::async_trait;
use domain::protocol::{CommentPage, CreateCommentRequest, Cursor, LikeResponse};
use domain::{BoardKey, CommentId, CommentRecord};

use crate::error::{ApiError, ClipboardError};

#[async_trait]
pub trait CommentApi: Send + Sync {
    /// One page of a board's comments. `cursor` is `None` for the first page.
    async fn list_comments(
        &self,
        board: &BoardKey,
        cursor: Option<&Cursor>,
        size: u32,
    ) -> Result<CommentPage, ApiError>;

    /// Returns the created record when the backend echoes it back.
    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<Option<CommentRecord>, ApiError>;

    async fn update_comment(&self, id: CommentId, content: &str) -> Result<(), ApiError>;

    async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError>;

    async fn toggle_like(&self, id: CommentId) -> Result<LikeResponse, ApiError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
