//! Links between rendered line tags and the source viewer.
//!
//! Outbound, a clicked tag chip calls the registered `on_line_click` handler. Inbound,
//! [`ViewerBridge::highlight_lines`] publishes [`ViewerCommand`]s that the viewer applies:
//! highlight the lines, scroll to them, and clear the highlight after a delay.

use domain::line_tag::{self, LineTagSegment};
use domain::{LineRange, ViewerCommand};
use futures::stream::Stream;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub type LineClickHandler = Arc<dyn Fn(LineRange) + Send + Sync>;

/// A renderable piece of a comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chip {
    Text(String),
    /// Disabled (`interactive == false`) when nobody listens for line clicks.
    Tag {
        label: String,
        range: LineRange,
        interactive: bool,
    },
}

#[derive(Clone, Default)]
pub struct TagActivation {
    on_line_click: Option<LineClickHandler>,
}

impl TagActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(handler: LineClickHandler) -> Self {
        Self {
            on_line_click: Some(handler),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.on_line_click.is_some()
    }

    pub fn chips(&self, body: &str) -> Vec<Chip> {
        let interactive = self.is_interactive();
        line_tag::parse(body)
            .into_iter()
            .map(|segment| match segment {
                LineTagSegment::Text { raw } => Chip::Text(raw),
                LineTagSegment::Tag { raw, range } => Chip::Tag {
                    label: raw,
                    range,
                    interactive,
                },
            })
            .collect()
    }

    /// Returns false when no handler is registered.
    pub fn activate(&self, range: LineRange) -> bool {
        match &self.on_line_click {
            Some(handler) => {
                handler(range);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ViewerOptions {
    pub line_height_px: u32,
    /// Lines above the target that stay visible after scrolling.
    pub scroll_margin_px: u32,
    pub highlight_clear: Duration,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            line_height_px: 20,
            scroll_margin_px: 100,
            highlight_clear: Duration::from_millis(3000),
        }
    }
}

#[derive(Default)]
struct HighlightSlot {
    active: Option<LineRange>,
    generation: u64,
    timer: Option<CancellationToken>,
}

/// Tag clicks may arrive on threads outside the runtime (UI callbacks), so the clear
/// timer is spawned through the runtime the bridge was created on.
#[derive(Clone)]
pub struct ViewerBridge {
    options: ViewerOptions,
    tx: broadcast::Sender<ViewerCommand>,
    slot: Arc<Mutex<HighlightSlot>>,
    runtime: Option<Handle>,
}

impl ViewerBridge {
    pub fn new(options: ViewerOptions) -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self {
            options,
            tx,
            slot: Arc::new(Mutex::new(HighlightSlot::default())),
            runtime: Handle::try_current().ok(),
        }
    }

    fn slot(&self) -> MutexGuard<'_, HighlightSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewerCommand> {
        self.tx.subscribe()
    }

    /// Commands as a stream. Lagged receivers skip what they missed.
    pub fn commands(&self) -> impl Stream<Item = ViewerCommand> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|result| result.ok())
    }

    pub fn highlighted(&self) -> Option<LineRange> {
        self.slot().active
    }

    pub fn scroll_offset(&self, start_line: u32) -> u32 {
        start_line
            .saturating_sub(1)
            .saturating_mul(self.options.line_height_px)
            .saturating_sub(self.options.scroll_margin_px)
    }

    /// Highlights `start_line..=end_line`, scrolls to it, and schedules the clear.
    /// A newer call replaces both the highlight and the pending clear.
    pub fn highlight_lines(&self, start_line: u32, end_line: u32) {
        let range = LineRange::new_unchecked(start_line, end_line);
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.slot();
            if let Some(previous) = slot.timer.replace(token.clone()) {
                previous.cancel();
            }
            slot.active = Some(range);
            slot.generation += 1;
            slot.generation
        };

        let offset = self.scroll_offset(start_line);
        debug!("Highlighting {} (scroll to {}px)", range, offset);
        // no subscribers is fine; the viewer may not be mounted yet
        let _ = self.tx.send(ViewerCommand::highlight(range));
        let _ = self.tx.send(ViewerCommand::Scroll { offset });

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!("No async runtime, highlight {} will not clear on its own", range);
            return;
        };
        let slot = self.slot.clone();
        let tx = self.tx.clone();
        let delay = self.options.highlight_clear;
        runtime.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.generation != generation {
                        return;
                    }
                    slot.active = None;
                    slot.timer = None;
                    drop(slot);
                    debug!("Clearing highlight {}", range);
                    let _ = tx.send(ViewerCommand::Clear);
                }
                _ = token.cancelled() => {}
            }
        });
    }

    /// A handler that forwards tag clicks to [`Self::highlight_lines`].
    pub fn line_click_handler(&self) -> LineClickHandler {
        let bridge = self.clone();
        Arc::new(move |range: LineRange| bridge.highlight_lines(range.start_line, range.end_line))
    }
}
