use async_trait::async_trait;
use tracing::debug;

use crate::error::ClipboardError;
use crate::traits::Clipboard;

/// The desktop clipboard. Each write opens a fresh handle on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))
        })
        .await
        .map_err(|e| {
            debug!("Clipboard task failed: {}", e);
            ClipboardError::Unavailable(e.to_string())
        })?
    }
}
