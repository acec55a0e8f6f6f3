//! Threaded comment engine for code review boards.
//!
//! [`CommentSection`] loads a board's comments page by page, keeps the two-level tree,
//! toggles likes optimistically, and forwards line-tag clicks to the source viewer
//! through [`ViewerBridge`]. [`SelectionEmitter`] goes the other way: it turns a code
//! selection into a tag for the comment composer.

pub mod bridge;
pub mod config;
pub mod engagement;
mod error;
mod orchestrator;
pub mod pagination;
pub mod selection;

#[cfg(test)]
mod testing;

pub use bridge::{Chip, LineClickHandler, TagActivation, ViewerBridge, ViewerOptions};
pub use engagement::{EngagementController, EngagementOptions, EngagementSource, ToggleOutcome};
pub use error::SectionError;
pub use orchestrator::{CommentSection, SectionOptions};
pub use pagination::{LoadMore, PageOptions, PageSnapshot, PaginationController};
pub use selection::{SelectionEmitter, SelectionSnapshot, Toolbar};
