//! Wire shapes of the comment backend.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::models::{BoardType, CommentId, CommentRecord};

/// Opaque continuation token. The backend sends either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Cursor(s),
            Raw::Int(n) => Cursor(n.to_string()),
            Raw::Float(n) => Cursor(n.to_string()),
        })
    }
}

/// `GET /comment` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    #[serde(default)]
    pub content: Vec<CommentRecord>,
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub total_elements: u64,
}

/// `POST /comments` body. `parent_comment_id` is `null` for a root comment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub board_id: i64,
    pub board_type: BoardType,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
}

/// `PUT /comment/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// `POST /like/comment/{id}` response. Either field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    #[serde(default, alias = "isLiked")]
    pub liked: Option<bool>,
    #[serde(default)]
    pub like_count: Option<u32>,
}
