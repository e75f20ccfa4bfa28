#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use codeleap::backend::{
    BackendError, CreatePayload, PostsBackend, RemoteId, RemotePost, UpdatePayload,
};
use codeleap::config::Config;
use codeleap::db;
use codeleap::routes;
use codeleap::state::AppState;
use codeleap::store::{SharedStore, Store};
use codeleap::sync::Feed;

/// In-memory stand-in for the careers API.
#[derive(Default)]
pub struct FakeBackend {
    pub posts: Mutex<Vec<RemotePost>>,
    next_id: AtomicI64,
    failing: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_posts(posts: Vec<RemotePost>) -> Arc<Self> {
        let backend = Self::default();
        *backend.posts.lock().unwrap() = posts;
        backend.next_id.store(1_000, Ordering::SeqCst);
        Arc::new(backend)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(BackendError::Status {
                status: 500,
                body: "server down".into(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn remote_post(id: i64, username: &str, created: &str, title: &str) -> RemotePost {
    RemotePost {
        id: RemoteId::Number(id),
        username: username.into(),
        created_datetime: created.into(),
        title: title.into(),
        content: format!("{} content", title),
    }
}

#[async_trait]
impl PostsBackend for FakeBackend {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, BackendError> {
        self.record("list".into())?;
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn create_post(&self, payload: &CreatePayload) -> Result<RemotePost, BackendError> {
        self.record(format!("create {}", payload.title))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let post = RemotePost {
            id: RemoteId::Number(id),
            username: payload.username.clone(),
            created_datetime: chrono::Utc::now().to_rfc3339(),
            title: payload.title.clone(),
            content: payload.content.clone(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: &str,
        payload: &UpdatePayload,
    ) -> Result<RemotePost, BackendError> {
        self.record(format!("update {}", id))?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id.to_string() == id)
            .ok_or(BackendError::Status {
                status: 404,
                body: "not found".into(),
            })?;
        if let Some(title) = &payload.title {
            post.title = title.clone();
        }
        if let Some(content) = &payload.content {
            post.content = content.clone();
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &str) -> Result<(), BackendError> {
        self.record(format!("delete {}", id))?;
        self.posts.lock().unwrap().retain(|p| p.id.to_string() != id);
        Ok(())
    }
}

/// App state backed by a temp database. Keep the `TempDir` alive for the test.
pub fn test_state(backend: Option<Arc<dyn PostsBackend>>) -> (AppState, TempDir) {
    let tmp = TempDir::new().unwrap();
    let pool = db::create_pool(&tmp.path().join("test.db")).unwrap();
    db::run_migrations(&pool).unwrap();

    let state = AppState {
        db: pool,
        config: Config::default(),
        feed: Feed::new(SharedStore::new(Store::new()), backend),
    };
    (state, tmp)
}

pub fn test_app(state: &AppState) -> Router {
    routes::router().with_state(state.clone())
}

/// Send a request and decode the JSON body (Null when empty or not JSON).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn sign_in(app: &Router, name: &str) {
    let (status, _) = send(
        app,
        "PUT",
        "/api/session",
        Some(serde_json::json!({ "username": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
