//! Cursor pagination over a board's root comments.
//!
//! Pages accumulate into one flat record list, and the tree is rebuilt from that list
//! after every change. `load_initial` calls are not cancelled; whichever response
//! resolves last is what the section shows. A `load_more` response that resolves after a
//! newer `load_initial` is dropped, since its cursor belongs to the older listing.

use adapter::CommentApi;
use domain::protocol::Cursor;
use domain::tree::{self, CommentTreeNode};
use domain::{BoardKey, CommentId, CommentRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storage::RecordStore;
use tracing::{debug, error, info, warn};

use crate::error::SectionError;

#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub page_size: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Summary of the listing after a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub board: BoardKey,
    pub has_next: bool,
    pub total_count: u64,
    pub loaded: usize,
    pub roots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    Loaded { added: usize, snapshot: PageSnapshot },
    /// Nothing left, nothing loaded yet, or another `load_more` is in flight.
    Skipped,
    /// The board was reloaded while this page was in flight.
    Stale,
}

#[derive(Default)]
struct PageState {
    board: Option<BoardKey>,
    cursor: Option<Cursor>,
    has_next: bool,
    total_count: u64,
    store: RecordStore,
    tree: Vec<CommentTreeNode>,
    loading_more: bool,
    epoch: u64,
}

impl PageState {
    fn rebuild(&mut self) {
        self.tree = tree::assemble(self.store.records());
    }

    fn snapshot(&self, board: BoardKey) -> PageSnapshot {
        PageSnapshot {
            board,
            has_next: self.has_next,
            total_count: self.total_count,
            loaded: self.store.len(),
            roots: self.tree.len(),
        }
    }
}

#[derive(Clone)]
pub struct PaginationController {
    api: Arc<dyn CommentApi>,
    options: PageOptions,
    state: Arc<Mutex<PageState>>,
}

impl PaginationController {
    pub fn new(api: Arc<dyn CommentApi>, options: PageOptions) -> Self {
        Self {
            api,
            options,
            state: Arc::new(Mutex::new(PageState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the first page of `board` and replaces the listing with it.
    ///
    /// Switching boards clears the old listing up front. Reloading the same board keeps
    /// what is shown until the new page arrives, so a failed reload changes nothing.
    pub async fn load_initial(&self, board: BoardKey) -> Result<PageSnapshot, SectionError> {
        {
            let mut state = self.state();
            state.epoch += 1;
            // any load_more in flight is now stale and will not clear this itself
            state.loading_more = false;
            if state.board.as_ref() != Some(&board) {
                debug!("Switching listing to {}", board);
                let epoch = state.epoch;
                *state = PageState {
                    board: Some(board.clone()),
                    epoch,
                    ..PageState::default()
                };
            }
        }

        let page = match self
            .api
            .list_comments(&board, None, self.options.page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to load comments for {}: {}", board, e);
                return Err(e.into());
            }
        };

        let mut state = self.state();
        state.epoch += 1;
        state.board = Some(board.clone());
        state.loading_more = false;
        state.cursor = page.next_cursor;
        state.has_next = page.has_next;
        state.total_count = page.total_elements;
        state.store.replace(page.content);
        state.rebuild();

        let snapshot = state.snapshot(board);
        info!(
            "Loaded {} comment(s) for {} (has_next={}, total={})",
            snapshot.loaded, snapshot.board, snapshot.has_next, snapshot.total_count
        );
        Ok(snapshot)
    }

    /// Appends the next page. A failed request leaves the cursor where it was.
    pub async fn load_more(&self) -> Result<LoadMore, SectionError> {
        let (board, cursor, epoch) = {
            let mut state = self.state();
            let Some(board) = state.board.clone() else {
                return Ok(LoadMore::Skipped);
            };
            if !state.has_next || state.loading_more {
                return Ok(LoadMore::Skipped);
            }
            state.loading_more = true;
            (board, state.cursor.clone(), state.epoch)
        };

        let result = self
            .api
            .list_comments(&board, cursor.as_ref(), self.options.page_size)
            .await;

        let mut state = self.state();
        if state.epoch != epoch {
            debug!("Discarding page for {} (listing was reloaded)", board);
            return Ok(LoadMore::Stale);
        }
        state.loading_more = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to load more comments for {}: {}", board, e);
                return Err(e.into());
            }
        };

        let added = state.store.append(page.content);
        state.cursor = page.next_cursor;
        state.has_next = page.has_next;
        state.total_count = page.total_elements;
        state.rebuild();

        let snapshot = state.snapshot(board);
        info!(
            "Loaded {} more comment(s) for {} (has_next={})",
            added, snapshot.board, snapshot.has_next
        );
        Ok(LoadMore::Loaded { added, snapshot })
    }

    pub fn patch_body(&self, id: CommentId, body: String) -> bool {
        let mut state = self.state();
        let patched = state.store.patch_body(id, body);
        if patched {
            state.rebuild();
        }
        patched
    }

    pub fn patch_engagement(&self, id: CommentId, liked: bool, count: u32) -> bool {
        let mut state = self.state();
        let patched = state.store.patch_engagement(id, liked, count);
        if patched {
            state.rebuild();
        }
        patched
    }

    pub fn board(&self) -> Option<BoardKey> {
        self.state().board.clone()
    }

    pub fn has_next(&self) -> bool {
        self.state().has_next
    }

    pub fn total_count(&self) -> u64 {
        self.state().total_count
    }

    pub fn is_loading_more(&self) -> bool {
        self.state().loading_more
    }

    pub fn records(&self) -> Vec<CommentRecord> {
        self.state().store.records().to_vec()
    }

    pub fn record(&self, id: CommentId) -> Option<CommentRecord> {
        self.state().store.get(id).cloned()
    }

    pub fn tree(&self) -> Vec<CommentTreeNode> {
        self.state().tree.clone()
    }
}
