use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::ClipboardError;
use crate::traits::Clipboard;

/// Keeps every write in memory. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn broken() -> Self {
        Self {
            writes: Arc::default(),
            broken: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.writes.lock().ok()?.last().cloned()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.broken {
            return Err(ClipboardError::Unavailable("write rejected".into()));
        }
        let mut writes = self
            .writes
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;
        writes.push(text.to_string());
        Ok(())
    }
}
