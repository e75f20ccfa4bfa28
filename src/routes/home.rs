use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::models::{is_owner, minutes_ago, Comment, Post};
use crate::state::AppState;
use crate::view::FeedQuery;

// --- View structs ---

pub struct FeedComment {
    pub author: String,
    pub text: String,
    pub age: String,
    pub like_count: usize,
    pub dislike_count: usize,
    pub is_mine: bool,
}

pub struct FeedPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub age: String,
    pub like_count: usize,
    pub dislike_count: usize,
    pub images: Vec<String>,
    pub video_url: String,
    pub shared_comment: String,
    pub is_mine: bool,
    pub comments: Vec<FeedComment>,
}

#[derive(Template)]
#[template(path = "pages/feed.html")]
pub struct FeedTemplate {
    pub username: Option<String>,
    pub posts: Vec<FeedPost>,
    pub query: String,
    pub sort: &'static str,
    pub media: bool,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Html<FeedTemplate> {
    let snapshot = state.store().snapshot().await;
    let now = chrono::Utc::now().timestamp_millis();
    let username = snapshot.username;

    let posts = query
        .apply(&snapshot.posts)
        .iter()
        .map(|p| feed_post(p, username.as_deref(), now))
        .collect();

    Html(FeedTemplate {
        username,
        posts,
        query: query.q.unwrap_or_default(),
        sort: query.sort.as_str(),
        media: query.media,
    })
}

fn feed_post(post: &Post, username: Option<&str>, now: i64) -> FeedPost {
    FeedPost {
        id: post.id.clone(),
        title: post.title.clone(),
        content: post.content.clone(),
        author: post.author.clone(),
        age: format_relative_time(post.created_at, now),
        like_count: post.likes.len(),
        dislike_count: post.dislikes.len(),
        images: post.images.clone(),
        video_url: post.video_url.clone().unwrap_or_default(),
        shared_comment: post.shared_comment.clone().unwrap_or_default(),
        is_mine: is_owner(Some(&post.author), username),
        comments: post
            .comments
            .iter()
            .map(|c| feed_comment(c, username, now))
            .collect(),
    }
}

fn feed_comment(comment: &Comment, username: Option<&str>, now: i64) -> FeedComment {
    FeedComment {
        author: comment.author.clone(),
        text: comment.text.clone(),
        age: format_relative_time(comment.created_at, now),
        like_count: comment.likes.len(),
        dislike_count: comment.dislikes.len(),
        is_mine: is_owner(Some(&comment.author), username),
    }
}

// --- Time formatting ---

pub fn format_relative_time(created_at: i64, now: i64) -> String {
    let minutes = minutes_ago(created_at, now);
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(created_at)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}
