use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::line_tag::{self, LineTagSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardType(String);

impl BoardType {
    pub fn new(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        if s.is_empty() {
            return Err(DomainError::EmptyBoardType);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidBoardType(s));
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a board's comment section. Pagination state is reset whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardKey {
    pub board_id: i64,
    pub board_type: BoardType,
}

impl BoardKey {
    pub fn new(board_id: i64, board_type: BoardType) -> Self {
        Self {
            board_id,
            board_type,
        }
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.board_type, self.board_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    #[serde(default, alias = "parentCommentId")]
    pub parent_id: Option<CommentId>,
    pub author_id: i64,
    pub author_name: String,
    #[serde(alias = "content")]
    pub body: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default, alias = "isLiked")]
    pub is_liked_by_viewer: bool,
    pub board_id: i64,
    pub board_type: BoardType,
}

impl CommentRecord {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn board_key(&self) -> BoardKey {
        BoardKey::new(self.board_id, self.board_type.clone())
    }

    pub fn engagement(&self) -> EngagementState {
        EngagementState {
            liked: self.is_liked_by_viewer,
            count: self.like_count,
            pending: false,
        }
    }

    /// Body split into plain text and line tags. Recomputed on every call.
    pub fn segments(&self) -> Vec<LineTagSegment> {
        line_tag::parse(&self.body)
    }
}

/// Per-comment like state as seen by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngagementState {
    pub liked: bool,
    pub count: u32,
    pub pending: bool,
}

impl EngagementState {
    /// The optimistic guess for a toggle: flip `liked`, move `count` by exactly one.
    pub fn flipped(self) -> Self {
        let liked = !self.liked;
        let count = if liked {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
        Self {
            liked,
            count,
            pending: self.pending,
        }
    }
}

/// An inclusive, 1-based range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
}

impl LineRange {
    pub fn new(start_line: u32, end_line: u32) -> Result<Self, DomainError> {
        if start_line == 0 {
            return Err(DomainError::ZeroLine(start_line));
        }
        if end_line < start_line {
            return Err(DomainError::InvertedRange {
                start: start_line,
                end: end_line,
            });
        }
        Ok(Self {
            start_line,
            end_line,
        })
    }

    /// Builds a range without checking ordering. Tags written by hand may carry `end < start`.
    pub fn new_unchecked(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub fn single(line: u32) -> Self {
        Self::new_unchecked(line, line)
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    /// Canonical tag text: `[L5]` or `[L5-8]`.
    pub fn tag(&self) -> String {
        if self.is_single_line() {
            format!("[L{}]", self.start_line)
        } else {
            format!("[L{}-{}]", self.start_line, self.end_line)
        }
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}
