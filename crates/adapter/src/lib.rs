mod drivers;
mod error;
mod traits;

pub use drivers::clipboard::{MemoryClipboard, SystemClipboard};
pub use drivers::http::{HttpCommentApi, HttpConfig};
pub use error::{ApiError, ClipboardError};
pub use traits::{Clipboard, CommentApi};

use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    #[default]
    System,
    Memory,
}

pub fn connect_api(config: HttpConfig) -> Result<Arc<dyn CommentApi>, ApiError> {
    info!("Using comment backend at {}", config.base_url);
    Ok(Arc::new(HttpCommentApi::new(config)?))
}

pub fn clipboard(mode: ClipboardMode) -> Arc<dyn Clipboard> {
    match mode {
        ClipboardMode::System => Arc::new(SystemClipboard),
        ClipboardMode::Memory => Arc::new(MemoryClipboard::new()),
    }
}
