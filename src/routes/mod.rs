pub mod comments;
pub mod feed;
pub mod home;
pub mod posts;
pub mod session;

use axum::routing::get;
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::models::{is_owner, Post};
use crate::state::AppState;

/// All routes of the app, without middleware layers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .merge(feed::router())
        .merge(session::router())
        .merge(posts::router())
        .merge(comments::router())
}

/// Current copy of a post, or 404.
pub(crate) async fn find_post(state: &AppState, id: &str) -> AppResult<Post> {
    state
        .store()
        .read(|s| s.post(id).cloned())
        .await
        .ok_or(AppError::NotFound)
}

/// Only the author of an entity may change or remove it.
pub(crate) fn require_owner(author: &str, username: &str) -> AppResult<()> {
    if is_owner(Some(author), Some(username)) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Trimmed text, or 400 with `message` when nothing is left.
pub(crate) fn non_empty(text: &str, message: &str) -> AppResult<String> {
    let text = text.trim();
    if text.is_empty() {
        Err(AppError::BadRequest(message.to_string()))
    } else {
        Ok(text.to_string())
    }
}
