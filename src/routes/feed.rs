use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt as _;

use crate::error::AppResult;
use crate::models::Snapshot;
use crate::state::AppState;
use crate::view::FeedQuery;

#[derive(Debug, Serialize)]
pub struct RefreshResult {
    pub count: usize,
    pub online: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/feed", get(snapshot))
        .route("/api/events", get(events))
        .route("/api/refresh", post(refresh))
}

/// Current snapshot, with posts searched, filtered and sorted per the query.
async fn snapshot(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<Snapshot> {
    let snapshot = state.store().snapshot().await;
    Json(Snapshot {
        posts: query.apply(&snapshot.posts),
        ..snapshot
    })
}

/// Server-sent events: the current snapshot right away, then one per mutation.
async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.store().subscribe()).map(|snapshot| {
        let event = Event::default()
            .event("snapshot")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to encode snapshot: {}", e);
                Event::default().event("error").data("encode failed")
            });
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn refresh(State(state): State<AppState>) -> AppResult<Json<RefreshResult>> {
    let count = state.feed.refresh().await?;
    Ok(Json(RefreshResult {
        count,
        online: state.feed.is_online(),
    }))
}
