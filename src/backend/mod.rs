//! Client side of the CodeLeap careers REST API. Only post CRUD lives there;
//! comments, votes and reshares never leave the local store.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Post;

pub use http::HttpBackend;

pub const DEFAULT_BASE_URL: &str = "https://dev.codeleap.co.uk/careers/";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Post ids come back as numbers from the API but are strings locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePost {
    pub id: RemoteId,
    pub username: String,
    #[serde(default)]
    pub created_datetime: String,
    pub title: String,
    pub content: String,
}

impl RemotePost {
    /// Map into a local post. Unparseable timestamps fall back to `now_ms`.
    pub fn into_post(self, now_ms: i64) -> Post {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_datetime)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(now_ms);

        Post {
            id: self.id.to_string(),
            title: self.title,
            content: self.content,
            author: self.username,
            created_at,
            comments: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            images: Vec::new(),
            video_url: None,
            shared_comment: None,
            remote: true,
        }
    }
}

/// `GET /` answers either with a bare array or a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Page {
        #[allow(dead_code)]
        count: Option<u64>,
        #[allow(dead_code)]
        next: Option<String>,
        #[allow(dead_code)]
        previous: Option<String>,
        results: Vec<RemotePost>,
    },
    Bare(Vec<RemotePost>),
}

impl ListResponse {
    pub fn into_posts(self) -> Vec<RemotePost> {
        match self {
            ListResponse::Page { results, .. } => results,
            ListResponse::Bare(posts) => posts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub username: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[async_trait]
pub trait PostsBackend: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, BackendError>;

    async fn create_post(&self, payload: &CreatePayload) -> Result<RemotePost, BackendError>;

    async fn update_post(
        &self,
        id: &str,
        payload: &UpdatePayload,
    ) -> Result<RemotePost, BackendError>;

    async fn delete_post(&self, id: &str) -> Result<(), BackendError>;
}
