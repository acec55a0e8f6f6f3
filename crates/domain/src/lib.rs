mod commands;
mod error;
mod events;
mod models;
pub mod line_tag;
pub mod protocol;
pub mod selection;
pub mod tree;

pub use commands::ViewerCommand;
pub use error::DomainError;
pub use events::SectionEvent;
pub use models::{BoardKey, BoardType, CommentId, CommentRecord, EngagementState, LineRange};
pub use line_tag::LineTagSegment;
pub use tree::CommentTreeNode;
