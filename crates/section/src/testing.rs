//! Scripted backend used by the engine tests.

use adapter::{ApiError, CommentApi};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::protocol::{CommentPage, CreateCommentRequest, Cursor, LikeResponse};
use domain::{BoardKey, BoardType, CommentId, CommentRecord};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn board() -> BoardKey {
    BoardKey::new(1, BoardType::new_unchecked("CODE_REVIEW".into()))
}

pub fn other_board() -> BoardKey {
    BoardKey::new(2, BoardType::new_unchecked("CODE_REVIEW".into()))
}

pub fn record(id: i64, parent: Option<i64>) -> CommentRecord {
    CommentRecord {
        id: CommentId::new(id),
        parent_id: parent.map(CommentId::new),
        author_id: 1,
        author_name: "reviewer".into(),
        body: format!("comment {id}"),
        created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
        like_count: 10,
        is_liked_by_viewer: false,
        board_id: 1,
        board_type: BoardType::new_unchecked("CODE_REVIEW".into()),
    }
}

pub fn page(records: Vec<CommentRecord>, next: Option<&str>, total: u64) -> CommentPage {
    CommentPage {
        content: records,
        next_cursor: next.map(Cursor::new),
        has_next: next.is_some(),
        total_elements: total,
    }
}

fn offline() -> ApiError {
    ApiError::Status {
        status: 503,
        body: "offline".into(),
    }
}

#[derive(Default)]
pub struct FakeApi {
    /// Pages keyed by `(board id, cursor)`; `None` is the first page.
    pages: Mutex<HashMap<(i64, Option<String>), CommentPage>>,
    like_replies: Mutex<VecDeque<Result<LikeResponse, ApiError>>>,
    like_gate: Mutex<Option<Arc<Notify>>>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    board_gates: Mutex<HashMap<i64, Arc<Notify>>>,
    pub fail_list: AtomicBool,
    pub fail_mutations: AtomicBool,
    pub list_calls: AtomicUsize,
    pub like_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    requested_cursors: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_page(&self, board: &BoardKey, cursor: Option<&str>, page: CommentPage) {
        self.pages
            .lock()
            .unwrap()
            .insert((board.board_id, cursor.map(str::to_string)), page);
    }

    pub fn push_like(&self, reply: Result<LikeResponse, ApiError>) {
        self.like_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_like_failure(&self) {
        self.push_like(Err(offline()));
    }

    /// Like requests wait until the returned handle is notified.
    pub fn gate_likes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.like_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// List requests wait until the returned handle is notified.
    pub fn gate_lists(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// List requests for `board` alone wait until the returned handle is notified.
    pub fn gate_board(&self, board: &BoardKey) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.board_gates
            .lock()
            .unwrap()
            .insert(board.board_id, gate.clone());
        gate
    }

    pub fn ungate_lists(&self) {
        *self.list_gate.lock().unwrap() = None;
    }

    pub fn requested_cursors(&self) -> Vec<Option<String>> {
        self.requested_cursors.lock().unwrap().clone()
    }

    fn mutation(&self, counter: &AtomicUsize) -> Result<(), ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(())
    }
}

#[async_trait]
impl CommentApi for FakeApi {
    async fn list_comments(
        &self,
        board: &BoardKey,
        cursor: Option<&Cursor>,
        _size: u32,
    ) -> Result<CommentPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let key = cursor.map(|c| c.as_str().to_string());
        self.requested_cursors.lock().unwrap().push(key.clone());

        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let gate = self.board_gates.lock().unwrap().get(&board.board_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&(board.board_id, key))
            .cloned()
            .unwrap_or_else(|| page(Vec::new(), None, 0)))
    }

    async fn create_comment(
        &self,
        _request: &CreateCommentRequest,
    ) -> Result<Option<CommentRecord>, ApiError> {
        self.mutation(&self.create_calls)?;
        Ok(None)
    }

    async fn update_comment(&self, _id: CommentId, _content: &str) -> Result<(), ApiError> {
        self.mutation(&self.update_calls)
    }

    async fn delete_comment(&self, _id: CommentId) -> Result<(), ApiError> {
        self.mutation(&self.delete_calls)
    }

    async fn toggle_like(&self, _id: CommentId) -> Result<LikeResponse, ApiError> {
        self.like_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.like_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.like_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(LikeResponse::default()))
    }
}
