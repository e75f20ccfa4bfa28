use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::models::{Comment, ANONYMOUS};
use crate::routes::{find_post, non_empty, require_owner};
use crate::state::AppState;
use crate::store::Vote;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts/{id}/comments", post(add_comment))
        .route(
            "/api/posts/{id}/comments/{comment_id}",
            patch(edit_comment).delete(delete_comment),
        )
        .route(
            "/api/posts/{id}/comments/{comment_id}/like",
            post(like_comment),
        )
        .route(
            "/api/posts/{id}/comments/{comment_id}/dislike",
            post(dislike_comment),
        )
}

async fn find_comment(state: &AppState, post_id: &str, comment_id: &str) -> AppResult<Comment> {
    find_post(state, post_id)
        .await?
        .comment(comment_id)
        .cloned()
        .ok_or(AppError::NotFound)
}

async fn add_comment(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(post_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> AppResult<Response> {
    let text = non_empty(&body.text, "Comment cannot be empty")?;
    let author = user.username().unwrap_or(ANONYMOUS).to_string();

    let comment = state
        .store()
        .mutate(|s| s.add_comment(&post_id, &author, &text))
        .await
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

async fn edit_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((post_id, comment_id)): Path<(String, String)>,
    Json(body): Json<CommentBody>,
) -> AppResult<Json<Comment>> {
    let text = non_empty(&body.text, "Comment cannot be empty")?;
    let existing = find_comment(&state, &post_id, &comment_id).await?;
    require_owner(&existing.author, &user.username)?;

    state
        .store()
        .mutate(|s| s.edit_comment(&post_id, &comment_id, &text))
        .await;

    Ok(Json(find_comment(&state, &post_id, &comment_id).await?))
}

async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let existing = find_comment(&state, &post_id, &comment_id).await?;
    require_owner(&existing.author, &user.username)?;

    state
        .store()
        .mutate(|s| s.delete_comment(&post_id, &comment_id))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

async fn like_comment(
    State(state): State<AppState>,
    user: MaybeUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<Comment>> {
    vote(&state, &post_id, &comment_id, user.username(), Vote::Like).await
}

async fn dislike_comment(
    State(state): State<AppState>,
    user: MaybeUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<Comment>> {
    vote(&state, &post_id, &comment_id, user.username(), Vote::Dislike).await
}

async fn vote(
    state: &AppState,
    post_id: &str,
    comment_id: &str,
    username: Option<&str>,
    vote: Vote,
) -> AppResult<Json<Comment>> {
    find_comment(state, post_id, comment_id).await?;
    state
        .store()
        .mutate(|s| match vote {
            Vote::Like => s.toggle_like_comment(post_id, comment_id, username),
            Vote::Dislike => s.toggle_dislike_comment(post_id, comment_id, username),
        })
        .await;
    Ok(Json(find_comment(state, post_id, comment_id).await?))
}
