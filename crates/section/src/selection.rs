//! Turns a text selection inside a source listing into a line tag.

use adapter::Clipboard;
use domain::{selection, LineRange};
use std::sync::Arc;
use tracing::debug;

pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;
pub type CopyTagHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom_left(&self) -> Point {
        Point {
            x: self.left,
            y: self.top + self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// What the host reports about the current native selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub anchor_in_listing: bool,
    pub focus_in_listing: bool,
    /// Character offset of the selection start within the whole listing.
    pub start_offset: usize,
    pub text: String,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toolbar {
    pub range: LineRange,
    pub position: Point,
    pub selected_text: String,
}

impl Toolbar {
    pub fn tag(&self) -> String {
        self.range.tag()
    }
}

pub struct SelectionEmitter {
    listing: String,
    toolbar: Option<Toolbar>,
    clipboard: Arc<dyn Clipboard>,
    on_message: Option<MessageHandler>,
    on_copy_tag: Option<CopyTagHandler>,
}

impl SelectionEmitter {
    pub fn new(listing: impl Into<String>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            listing: listing.into(),
            toolbar: None,
            clipboard,
            on_message: None,
            on_copy_tag: None,
        }
    }

    pub fn on_message(mut self, handler: MessageHandler) -> Self {
        self.on_message = Some(handler);
        self
    }

    pub fn on_copy_tag(mut self, handler: CopyTagHandler) -> Self {
        self.on_copy_tag = Some(handler);
        self
    }

    /// Swaps the listing, e.g. when another file is opened. Drops any toolbar.
    pub fn set_listing(&mut self, listing: impl Into<String>) {
        self.listing = listing.into();
        self.toolbar = None;
    }

    pub fn toolbar(&self) -> Option<&Toolbar> {
        self.toolbar.as_ref()
    }

    pub fn clear(&mut self) {
        self.toolbar = None;
    }

    /// Recomputes the toolbar from the latest selection. `None` means it collapsed.
    pub fn on_selection_change(&mut self, snapshot: Option<SelectionSnapshot>) -> Option<&Toolbar> {
        self.toolbar = snapshot.and_then(|s| {
            if s.text.is_empty() || !s.anchor_in_listing || !s.focus_in_listing {
                return None;
            }
            let range = selection::line_range(&self.listing, s.start_offset, &s.text);
            Some(Toolbar {
                range,
                position: s.bounds.bottom_left(),
                selected_text: s.text,
            })
        });
        self.toolbar.as_ref()
    }

    pub fn on_pointer_down(&mut self, inside_listing: bool) {
        if !inside_listing {
            self.toolbar = None;
        }
    }

    /// Copies the selected code verbatim. Returns false when there is nothing to copy or
    /// the clipboard refused the write.
    pub async fn copy_text(&mut self) -> bool {
        let Some(toolbar) = self.toolbar.take() else {
            return false;
        };
        let copied = self.write(&toolbar.selected_text).await;
        if copied {
            self.notify("Copied selected code");
        }
        copied
    }

    /// Copies the canonical tag and hands it to the composer. The composer gets the tag
    /// even if the clipboard write fails.
    pub async fn copy_tag(&mut self) -> Option<String> {
        let toolbar = self.toolbar.take()?;
        let tag = toolbar.tag();
        if self.write(&tag).await {
            self.notify(&format!("Copied line tag {}", tag));
        }
        if let Some(handler) = &self.on_copy_tag {
            handler(&tag);
        }
        Some(tag)
    }

    async fn write(&self, text: &str) -> bool {
        match self.clipboard.write_text(text).await {
            Ok(()) => true,
            Err(e) => {
                debug!("Clipboard write failed: {}", e);
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        if let Some(handler) = &self.on_message {
            handler(message);
        }
    }
}
