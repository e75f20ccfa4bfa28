//! Search, sort and media filtering over a list of posts.
//!
//! Pure functions shared by the JSON feed and the HTML page. The store keeps
//! its own order; views never write back.

use serde::{Deserialize, Serialize};

use crate::models::Post;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    MostLiked,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::MostLiked => "most_liked",
        }
    }
}

/// Query string of the feed endpoints: `?q=&sort=&media=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub sort: SortMode,
    pub media: bool,
}

impl FeedQuery {
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        filter_posts(posts, self.q.as_deref().unwrap_or(""), self.sort, self.media)
    }
}

pub fn has_media(post: &Post) -> bool {
    !post.images.is_empty() || post.video_url.as_deref().is_some_and(|v| !v.is_empty())
}

/// Posts matching `query` (case-insensitive, on title, content or author),
/// optionally only those with media, ordered by `sort`. Ties keep input order.
pub fn filter_posts(posts: &[Post], query: &str, sort: SortMode, media_only: bool) -> Vec<Post> {
    let needle = query.trim().to_lowercase();

    let mut list: Vec<Post> = posts
        .iter()
        .filter(|p| needle.is_empty() || matches(p, &needle))
        .filter(|p| !media_only || has_media(p))
        .cloned()
        .collect();

    match sort {
        SortMode::Newest => list.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => list.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::MostLiked => list.sort_by(|a, b| b.likes.len().cmp(&a.likes.len())),
    }
    list
}

fn matches(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.content.to_lowercase().contains(needle)
        || post.author.to_lowercase().contains(needle)
}
