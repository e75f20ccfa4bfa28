//! Post CRUD against the backend, mirrored into the store.
//!
//! The network call always comes first. The store is only touched once the
//! backend has confirmed the change; a failed call leaves local state as it
//! was and hands the error back to the caller. Posts the backend never saw
//! (reshares, offline creates) are edited and deleted locally.

use std::sync::Arc;

use crate::backend::{BackendError, CreatePayload, PostsBackend, UpdatePayload};
use crate::models::{NewPost, Post, PostEdit};
use crate::store::SharedStore;

#[derive(Clone)]
pub struct Feed {
    store: SharedStore,
    backend: Option<Arc<dyn PostsBackend>>,
}

impl Feed {
    pub fn new(store: SharedStore, backend: Option<Arc<dyn PostsBackend>>) -> Self {
        Self { store, backend }
    }

    /// Feed that never talks to a backend.
    pub fn offline(store: SharedStore) -> Self {
        Self::new(store, None)
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// Merge the backend's list into the store. Returns how many posts the
    /// backend listed.
    pub async fn refresh(&self) -> Result<usize, BackendError> {
        let Some(backend) = &self.backend else {
            return Ok(self.store.read(|s| s.posts().len()).await);
        };

        let remote = backend.list_posts().await?;
        let now = chrono::Utc::now().timestamp_millis();
        let posts: Vec<Post> = remote.into_iter().map(|p| p.into_post(now)).collect();
        let count = posts.len();
        tracing::info!("Loaded {} posts from backend", count);
        self.store.mutate(|s| s.merge_posts(posts)).await;
        Ok(count)
    }

    pub async fn create_post(&self, new: NewPost) -> Result<Post, BackendError> {
        let Some(backend) = &self.backend else {
            return Ok(self.store.mutate(|s| s.create_post(new)).await);
        };

        let payload = CreatePayload {
            username: new.author.clone(),
            title: new.title.clone(),
            content: new.content.clone(),
        };
        let remote = backend.create_post(&payload).await?;

        let mut post = remote.into_post(chrono::Utc::now().timestamp_millis());
        post.images = new.images;
        post.video_url = new.video_url;
        tracing::info!(post_id = %post.id, "Post created on backend");

        self.store.mutate(|s| s.adopt_post(post.clone())).await;
        Ok(post)
    }

    /// Backend to consult for `id`, if any. Local-only posts have none.
    async fn backend_for(&self, id: &str) -> Option<&Arc<dyn PostsBackend>> {
        let backend = self.backend.as_ref()?;
        let remote = self
            .store
            .read(|s| s.post(id).is_some_and(|p| p.remote))
            .await;
        remote.then_some(backend)
    }

    pub async fn edit_post(&self, id: &str, edit: PostEdit) -> Result<(), BackendError> {
        let Some(backend) = self.backend_for(id).await else {
            self.store.mutate(|s| s.edit_post(id, edit)).await;
            return Ok(());
        };

        let payload = UpdatePayload {
            title: Some(edit.title),
            content: Some(edit.content),
        };
        let remote = backend.update_post(id, &payload).await?;
        tracing::info!(post_id = %id, "Post updated on backend");

        let confirmed = PostEdit {
            title: remote.title,
            content: remote.content,
        };
        self.store.mutate(|s| s.edit_post(id, confirmed)).await;
        Ok(())
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), BackendError> {
        if let Some(backend) = self.backend_for(id).await {
            backend.delete_post(id).await?;
            tracing::info!(post_id = %id, "Post deleted on backend");
        }
        self.store.mutate(|s| s.delete_post(id)).await;
        Ok(())
    }
}
