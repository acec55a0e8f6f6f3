//! Optimistic like toggling.
//!
//! Each comment has an `idle -> inflight -> idle` cycle. The optimistic flip is applied
//! before the request is sent; a failed request restores the prior state exactly. The
//! `pending` flag stays set for a short cool-down after the request settles, and any
//! toggle arriving while it is set is ignored. When the cool-down ends the cell is
//! resynced from the [`EngagementSource`], if one is set, since upstream syncs were
//! skipped while it was pending.

use adapter::{ApiError, CommentApi};
use domain::{CommentId, CommentRecord, EngagementState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Current like state of a loaded comment, or `None` once it is no longer loaded.
pub type EngagementSource = Arc<dyn Fn(CommentId) -> Option<EngagementState> + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct EngagementOptions {
    pub cooldown: Duration,
}

impl Default for EngagementOptions {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(300),
        }
    }
}

#[derive(Debug)]
pub enum ToggleOutcome {
    /// A toggle for this comment is in flight or cooling down.
    Busy,
    /// The comment was never synced into the controller.
    Untracked,
    Confirmed(EngagementState),
    RolledBack {
        state: EngagementState,
        error: ApiError,
    },
}

impl ToggleOutcome {
    pub fn settled_state(&self) -> Option<EngagementState> {
        match self {
            ToggleOutcome::Confirmed(state) | ToggleOutcome::RolledBack { state, .. } => {
                Some(*state)
            }
            ToggleOutcome::Busy | ToggleOutcome::Untracked => None,
        }
    }
}

#[derive(Clone)]
pub struct EngagementController {
    api: Arc<dyn CommentApi>,
    options: EngagementOptions,
    cells: Arc<Mutex<HashMap<CommentId, EngagementState>>>,
    source: Option<EngagementSource>,
}

impl EngagementController {
    pub fn new(api: Arc<dyn CommentApi>, options: EngagementOptions) -> Self {
        Self {
            api,
            options,
            cells: Arc::new(Mutex::new(HashMap::new())),
            source: None,
        }
    }

    pub fn with_source(mut self, source: EngagementSource) -> Self {
        self.source = Some(source);
        self
    }

    fn cells(&self) -> MutexGuard<'_, HashMap<CommentId, EngagementState>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self, id: CommentId) -> Option<EngagementState> {
        self.cells().get(&id).copied()
    }

    /// Takes the like state from an upstream record unless a toggle is pending for it.
    pub fn sync(&self, record: &CommentRecord) {
        let mut cells = self.cells();
        match cells.get_mut(&record.id) {
            Some(cell) if cell.pending => {
                debug!("Keeping pending like state for comment {}", record.id);
            }
            Some(cell) => *cell = record.engagement(),
            None => {
                cells.insert(record.id, record.engagement());
            }
        }
    }

    /// Replaces the tracked set with `records`. Comments with a pending toggle are kept.
    pub fn reset_to(&self, records: &[CommentRecord]) {
        self.cells().retain(|_, cell| cell.pending);
        for record in records {
            self.sync(record);
        }
    }

    pub async fn toggle(&self, id: CommentId) -> ToggleOutcome {
        let prior = {
            let mut cells = self.cells();
            let Some(cell) = cells.get_mut(&id) else {
                return ToggleOutcome::Untracked;
            };
            if cell.pending {
                debug!("Ignoring like toggle for {} (pending)", id);
                return ToggleOutcome::Busy;
            }
            let prior = *cell;
            *cell = EngagementState {
                pending: true,
                ..prior.flipped()
            };
            prior
        };

        let result = self.api.toggle_like(id).await;

        let outcome = {
            let mut cells = self.cells();
            let cell = cells.entry(id).or_insert(EngagementState {
                pending: true,
                ..prior.flipped()
            });
            match result {
                Ok(reply) => {
                    if let Some(liked) = reply.liked {
                        cell.liked = liked;
                    }
                    if let Some(count) = reply.like_count {
                        cell.count = count;
                    }
                    ToggleOutcome::Confirmed(*cell)
                }
                Err(error) => {
                    warn!("Like toggle for {} failed, rolling back: {}", id, error);
                    cell.liked = prior.liked;
                    cell.count = prior.count;
                    ToggleOutcome::RolledBack {
                        state: *cell,
                        error,
                    }
                }
            }
        };

        self.release_after_cooldown(id);
        outcome
    }

    fn release_after_cooldown(&self, id: CommentId) {
        let cells = self.cells.clone();
        let source = self.source.clone();
        let cooldown = self.options.cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            let current = source.as_ref().map(|source| source(id));
            let mut cells = cells.lock().unwrap_or_else(PoisonError::into_inner);
            match current {
                Some(None) => {
                    debug!("Comment {} is no longer loaded, dropping its like state", id);
                    cells.remove(&id);
                }
                Some(Some(upstream)) => {
                    if let Some(cell) = cells.get_mut(&id) {
                        *cell = EngagementState {
                            pending: false,
                            ..upstream
                        };
                    }
                }
                None => {
                    if let Some(cell) = cells.get_mut(&id) {
                        cell.pending = false;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, FakeApi};
    use domain::protocol::LikeResponse;
    use std::sync::atomic::Ordering;

    fn controller(api: Arc<FakeApi>) -> EngagementController {
        let ctl = EngagementController::new(api, EngagementOptions::default());
        ctl.sync(&record(1, None));
        ctl.sync(&record(2, None));
        ctl
    }

    fn id(n: i64) -> CommentId {
        CommentId::new(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_flip_before_settlement() {
        let api = FakeApi::new();
        let gate = api.gate_likes();
        let ctl = controller(api.clone());

        let task = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.toggle(id(1)).await }
        });
        tokio::task::yield_now().await;

        let during = ctl.state(id(1)).unwrap();
        assert!(during.liked);
        assert_eq!(during.count, 11);
        assert!(during.pending);

        gate.notify_one();
        let outcome = task.await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::Confirmed(_)));
        let settled = ctl.state(id(1)).unwrap();
        assert!(settled.liked);
        assert_eq!(settled.count, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_rolls_back() {
        let api = FakeApi::new();
        api.push_like_failure();
        let ctl = controller(api);

        let outcome = ctl.toggle(id(1)).await;
        let ToggleOutcome::RolledBack { state, .. } = outcome else {
            panic!("expected rollback, got {outcome:?}");
        };
        assert!(!state.liked);
        assert_eq!(state.count, 10);
        assert_eq!(ctl.state(id(1)).map(|s| (s.liked, s.count)), Some((false, 10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_values_win() {
        let api = FakeApi::new();
        api.push_like(Ok(LikeResponse {
            liked: Some(true),
            like_count: Some(14),
        }));
        let ctl = controller(api);

        let outcome = ctl.toggle(id(1)).await;
        let state = outcome.settled_state().unwrap();
        assert!(state.liked);
        assert_eq!(state.count, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_tick_toggles_send_one_request() {
        let api = FakeApi::new();
        let ctl = controller(api.clone());

        let (first, second) = tokio::join!(ctl.toggle(id(1)), ctl.toggle(id(1)));
        assert!(matches!(first, ToggleOutcome::Confirmed(_)));
        assert!(matches!(second, ToggleOutcome::Busy));
        assert_eq!(api.like_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.state(id(1)).unwrap().count, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_keeps_lock_after_settlement() {
        let api = FakeApi::new();
        let ctl = controller(api.clone());

        ctl.toggle(id(1)).await;
        assert!(ctl.state(id(1)).unwrap().pending);
        assert!(matches!(ctl.toggle(id(1)).await, ToggleOutcome::Busy));

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert!(!ctl.state(id(1)).unwrap().pending);

        let again = ctl.toggle(id(1)).await;
        let state = again.settled_state().unwrap();
        assert!(!state.liked);
        assert_eq!(state.count, 10);
        assert_eq!(api.like_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_comments_are_independent() {
        let api = FakeApi::new();
        let ctl = controller(api.clone());

        let (a, b) = tokio::join!(ctl.toggle(id(1)), ctl.toggle(id(2)));
        assert!(matches!(a, ToggleOutcome::Confirmed(_)));
        assert!(matches!(b, ToggleOutcome::Confirmed(_)));
        assert_eq!(api.like_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_skips_pending_and_untracked_is_reported() {
        let api = FakeApi::new();
        let ctl = controller(api);

        ctl.toggle(id(1)).await;
        let mut upstream = record(1, None);
        upstream.like_count = 99;
        ctl.sync(&upstream);
        assert_eq!(ctl.state(id(1)).unwrap().count, 11);

        tokio::time::sleep(Duration::from_millis(301)).await;
        ctl.sync(&upstream);
        assert_eq!(ctl.state(id(1)).unwrap().count, 99);

        assert!(matches!(ctl.toggle(id(77)).await, ToggleOutcome::Untracked));
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_resyncs_from_source() {
        let api = FakeApi::new();
        let upstream: Arc<Mutex<HashMap<CommentId, EngagementState>>> = Arc::new(Mutex::new(
            HashMap::from([(id(1), record(1, None).engagement())]),
        ));
        let ctl = EngagementController::new(api, EngagementOptions::default()).with_source({
            let upstream = upstream.clone();
            Arc::new(move |comment: CommentId| upstream.lock().unwrap().get(&comment).copied())
        });
        ctl.sync(&record(1, None));
        ctl.sync(&record(2, None));

        ctl.toggle(id(1)).await;
        ctl.toggle(id(2)).await;
        // a reload lands while both are cooling down
        upstream.lock().unwrap().insert(
            id(1),
            EngagementState {
                liked: true,
                count: 12,
                pending: false,
            },
        );
        assert_eq!(ctl.state(id(1)).unwrap().count, 11);

        tokio::time::sleep(Duration::from_millis(301)).await;
        let state = ctl.state(id(1)).unwrap();
        assert_eq!((state.liked, state.count, state.pending), (true, 12, false));
        // comment 2 is not in the source any more
        assert_eq!(ctl.state(id(2)), None);
    }
}
