use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::settings;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionBody {
    pub username: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/session",
        get(current).put(set_username).delete(clear_username),
    )
}

async fn current(State(state): State<AppState>) -> Json<SessionBody> {
    let username = state.store().read(|s| s.username().map(str::to_string)).await;
    Json(SessionBody { username })
}

async fn set_username(
    State(state): State<AppState>,
    Json(body): Json<SessionBody>,
) -> AppResult<Json<SessionBody>> {
    let username = body
        .username
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    apply(&state, username).await
}

async fn clear_username(State(state): State<AppState>) -> AppResult<Json<SessionBody>> {
    apply(&state, None).await
}

/// Persist first, then update the store, so a failed write changes nothing.
async fn apply(state: &AppState, username: Option<String>) -> AppResult<Json<SessionBody>> {
    settings::save_username(&state.db, username.as_deref())?;
    tracing::info!("Display name set to {:?}", username);
    state
        .store()
        .mutate(|s| s.set_username(username.clone()))
        .await;
    Ok(Json(SessionBody { username }))
}
