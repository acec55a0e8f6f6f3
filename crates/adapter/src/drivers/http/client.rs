use async_trait::async_trait;
use domain::protocol::{
    CommentPage, CreateCommentRequest, Cursor, LikeResponse, UpdateCommentRequest,
};
use domain::{BoardKey, CommentId, CommentRecord};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::traits::CommentApi;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct HttpCommentApi {
    client: Client,
    base_url: String,
}

impl HttpCommentApi {
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(config.base_url));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into [`ApiError::Status`], keeping the body for the log.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!("Backend returned {} : {}", status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CommentApi for HttpCommentApi {
    async fn list_comments(
        &self,
        board: &BoardKey,
        cursor: Option<&Cursor>,
        size: u32,
    ) -> Result<CommentPage, ApiError> {
        let mut query: Vec<(&str, String)> = vec![
            ("boardId", board.board_id.to_string()),
            ("boardType", board.board_type.to_string()),
            ("size", size.to_string()),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c.to_string()));
        }

        let resp = self
            .client
            .get(self.url("/comment"))
            .query(&query)
            .send()
            .await?;
        let bytes = check(resp).await?.bytes().await?;
        let page: CommentPage = serde_json::from_slice(&bytes)?;
        debug!(
            "Fetched {} comment(s) for {} (has_next={})",
            page.content.len(),
            board,
            page.has_next
        );
        Ok(page)
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<Option<CommentRecord>, ApiError> {
        let resp = self
            .client
            .post(self.url("/comments"))
            .json(request)
            .send()
            .await?;
        let bytes = check(resp).await?.bytes().await?;
        // the section reloads after a create, so an unrecognised echo is not an error
        Ok(serde_json::from_slice(&bytes).ok())
    }

    async fn update_comment(&self, id: CommentId, content: &str) -> Result<(), ApiError> {
        let body = UpdateCommentRequest {
            content: content.to_string(),
        };
        let resp = self
            .client
            .put(self.url(&format!("/comment/{}", id)))
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("/comment/{}", id)))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn toggle_like(&self, id: CommentId) -> Result<LikeResponse, ApiError> {
        let resp = self
            .client
            .post(self.url(&format!("/like/comment/{}", id)))
            .send()
            .await?;
        let bytes = check(resp).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(LikeResponse::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
