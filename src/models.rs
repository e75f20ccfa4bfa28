use serde::{Deserialize, Serialize};

/// Maximum number of images a single post may carry.
pub const MAX_IMAGES: usize = 6;

/// Author name used when no display name has been set.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: i64,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_comment: Option<String>,
    /// Known to the posts backend. Local-only posts (reshares, offline
    /// creates) never reach the network.
    #[serde(default)]
    pub remote: bool,
}

impl Post {
    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

/// Input to `Store::create_post`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Fields an owner may change on an existing post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEdit {
    pub title: String,
    pub content: String,
}

/// Read-only view of the store handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub username: Option<String>,
    pub posts: Vec<Post>,
}

pub fn is_owner(author: Option<&str>, username: Option<&str>) -> bool {
    match (author, username) {
        (Some(a), Some(u)) => !a.is_empty() && !u.is_empty() && a == u,
        _ => false,
    }
}

/// Whole minutes between `created_at` and `now` (both ms since epoch), rounded.
pub fn minutes_ago(created_at: i64, now: i64) -> i64 {
    (now.saturating_sub(created_at) as f64 / 60_000.0).round() as i64
}
