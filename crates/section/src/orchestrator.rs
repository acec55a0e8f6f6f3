use adapter::CommentApi;
use domain::protocol::CreateCommentRequest;
use domain::tree::CommentTreeNode;
use domain::{BoardKey, CommentId, CommentRecord, EngagementState, LineRange, SectionEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::bridge::{TagActivation, ViewerBridge, ViewerOptions};
use crate::engagement::{EngagementController, EngagementOptions, ToggleOutcome};
use crate::error::SectionError;
use crate::pagination::{LoadMore, PageOptions, PageSnapshot, PaginationController};

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionOptions {
    pub page: PageOptions,
    pub engagement: EngagementOptions,
    pub viewer: ViewerOptions,
}

/// One board's comment section: owns the tree and wires tag clicks to the viewer.
#[derive(Clone)]
pub struct CommentSection {
    api: Arc<dyn CommentApi>,
    pages: PaginationController,
    engagement: EngagementController,
    viewer: ViewerBridge,
    events: broadcast::Sender<SectionEvent>,
}

impl CommentSection {
    pub fn new(api: Arc<dyn CommentApi>, options: SectionOptions) -> Self {
        let (events, _rx) = broadcast::channel(64);
        let pages = PaginationController::new(api.clone(), options.page);
        let engagement = EngagementController::new(api.clone(), options.engagement).with_source({
            let pages = pages.clone();
            Arc::new(move |id: CommentId| pages.record(id).map(|r| r.engagement()))
        });
        Self {
            pages,
            engagement,
            viewer: ViewerBridge::new(options.viewer),
            api,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SectionEvent> {
        self.events.subscribe()
    }

    pub fn viewer(&self) -> &ViewerBridge {
        &self.viewer
    }

    pub fn board(&self) -> Option<BoardKey> {
        self.pages.board()
    }

    pub fn tree(&self) -> Vec<CommentTreeNode> {
        self.pages.tree()
    }

    pub fn records(&self) -> Vec<CommentRecord> {
        self.pages.records()
    }

    /// Count for the "N comments" badge, as reported by the backend.
    pub fn total_count(&self) -> u64 {
        self.pages.total_count()
    }

    pub fn has_next(&self) -> bool {
        self.pages.has_next()
    }

    pub fn engagement(&self, id: CommentId) -> Option<EngagementState> {
        self.engagement.state(id)
    }

    /// Tag activation for rendered comments; clicks go to this section's viewer.
    pub fn tag_activation(&self) -> TagActivation {
        TagActivation::with_handler(self.viewer.line_click_handler())
    }

    pub fn on_line_click(&self, range: LineRange) {
        self.viewer.highlight_lines(range.start_line, range.end_line);
    }

    fn emit(&self, event: SectionEvent) {
        let _ = self.events.send(event);
    }

    fn notice(&self, message: impl Into<String>) {
        self.emit(SectionEvent::Notice {
            message: message.into(),
        });
    }

    fn announce(&self, snapshot: &PageSnapshot) {
        self.emit(SectionEvent::TreeRefreshed {
            board: snapshot.board.clone(),
            roots: snapshot.roots,
            loaded: snapshot.loaded,
        });
        self.emit(SectionEvent::TotalCount {
            board: snapshot.board.clone(),
            total: snapshot.total_count,
        });
    }

    pub async fn load_initial(&self, board: BoardKey) -> Result<PageSnapshot, SectionError> {
        let snapshot = self.pages.load_initial(board).await?;
        self.engagement.reset_to(&self.pages.records());
        self.announce(&snapshot);
        Ok(snapshot)
    }

    pub async fn load_more(&self) -> Result<LoadMore, SectionError> {
        let outcome = self.pages.load_more().await?;
        if let LoadMore::Loaded { snapshot, .. } = &outcome {
            for record in self.pages.records() {
                self.engagement.sync(&record);
            }
            self.announce(snapshot);
        }
        Ok(outcome)
    }

    /// Reloads after a saved mutation. The listing on screen is kept when this fails.
    async fn reload(&self, board: BoardKey) -> Result<PageSnapshot, SectionError> {
        match self.load_initial(board).await {
            Ok(snapshot) => Ok(snapshot),
            Err(SectionError::Api(e)) => {
                warn!("Saved, but reloading comments failed: {}", e);
                self.notice("Saved. The comment list could not be refreshed.");
                Err(SectionError::Reload(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Posts a comment, or a reply when `parent` is set, then reloads from the first page.
    ///
    /// [`SectionError::Reload`] means the comment was posted; do not post it again.
    pub async fn create_comment(
        &self,
        content: &str,
        parent: Option<CommentId>,
    ) -> Result<PageSnapshot, SectionError> {
        if content.trim().is_empty() {
            return Err(SectionError::EmptyContent);
        }
        let board = self.pages.board().ok_or(SectionError::NotLoaded)?;
        let request = CreateCommentRequest {
            board_id: board.board_id,
            board_type: board.board_type.clone(),
            parent_comment_id: parent,
            content: content.to_string(),
        };
        if let Err(e) = self.api.create_comment(&request).await {
            warn!("Posting comment on {} failed: {}", board, e);
            self.notice("Could not post the comment. Please try again.");
            return Err(e.into());
        }
        info!("Posted comment on {}", board);
        self.reload(board).await
    }

    /// Edits a comment body and patches it in place. No reload.
    pub async fn edit_comment(&self, id: CommentId, content: &str) -> Result<(), SectionError> {
        if content.trim().is_empty() {
            return Err(SectionError::EmptyContent);
        }
        if let Err(e) = self.api.update_comment(id, content).await {
            warn!("Editing comment {} failed: {}", id, e);
            self.notice("Could not update the comment. Please try again.");
            return Err(e.into());
        }
        if self.pages.patch_body(id, content.to_string()) {
            if let Some(board) = self.pages.board() {
                let tree = self.pages.tree();
                self.emit(SectionEvent::TreeRefreshed {
                    board,
                    roots: tree.len(),
                    loaded: self.pages.records().len(),
                });
            }
        }
        Ok(())
    }

    /// Deletes a comment, then reloads from the first page.
    pub async fn delete_comment(&self, id: CommentId) -> Result<PageSnapshot, SectionError> {
        let board = self.pages.board().ok_or(SectionError::NotLoaded)?;
        if let Err(e) = self.api.delete_comment(id).await {
            warn!("Deleting comment {} failed: {}", id, e);
            self.notice("Could not delete the comment. Please try again.");
            return Err(e.into());
        }
        info!("Deleted comment {} on {}", id, board);
        self.reload(board).await
    }

    pub async fn toggle_like(&self, id: CommentId) -> ToggleOutcome {
        let outcome = self.engagement.toggle(id).await;
        if let Some(state) = outcome.settled_state() {
            self.pages.patch_engagement(id, state.liked, state.count);
            self.emit(SectionEvent::EngagementChanged {
                comment_id: id,
                state,
            });
        }
        if let ToggleOutcome::RolledBack { .. } = outcome {
            self.notice("Could not update the like. Please try again.");
        }
        outcome
    }
}
