mod common;

use std::sync::Arc;

use codeleap::backend::PostsBackend;
use codeleap::models::{NewPost, PostEdit};
use codeleap::store::{SharedStore, Store};
use codeleap::sync::Feed;

use common::{remote_post, FakeBackend};

fn online_feed(backend: Arc<FakeBackend>) -> Feed {
    let backend: Arc<dyn PostsBackend> = backend;
    Feed::new(SharedStore::new(Store::new()), Some(backend))
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.into(),
        content: "body".into(),
        author: "alice".into(),
        images: vec!["a.png".into()],
        video_url: Some("https://youtu.be/x".into()),
    }
}

#[tokio::test]
async fn refresh_loads_posts_newest_first() {
    let backend = FakeBackend::with_posts(vec![
        remote_post(1, "alice", "2024-01-01T10:00:00Z", "old"),
        remote_post(2, "bob", "2024-03-01T10:00:00Z", "newest"),
        remote_post(3, "carol", "2024-02-01T10:00:00Z", "middle"),
    ]);
    let feed = online_feed(backend);

    assert_eq!(feed.refresh().await.unwrap(), 3);
    let snap = feed.store().snapshot().await;
    let ids: Vec<_> = snap.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["2", "3", "1"]);
    assert_eq!(snap.posts[0].author, "bob");
}

#[tokio::test]
async fn create_goes_to_backend_then_store() {
    let backend = FakeBackend::new();
    let feed = online_feed(backend.clone());

    let post = feed.create_post(new_post("hello")).await.unwrap();
    assert_eq!(backend.calls(), vec!["create hello".to_string()]);
    assert_eq!(post.author, "alice");
    assert_eq!(post.images, vec!["a.png".to_string()]);
    assert_eq!(post.video_url.as_deref(), Some("https://youtu.be/x"));

    let snap = feed.store().snapshot().await;
    assert_eq!(snap.posts.len(), 1);
    assert_eq!(snap.posts[0].id, post.id);
}

#[tokio::test]
async fn failed_create_leaves_store_untouched() {
    let backend = FakeBackend::new();
    backend.set_failing(true);
    let feed = online_feed(backend);

    assert!(feed.create_post(new_post("hello")).await.is_err());
    assert!(feed.store().snapshot().await.posts.is_empty());
}

#[tokio::test]
async fn edit_applies_backend_confirmed_fields() {
    let backend = FakeBackend::with_posts(vec![remote_post(7, "alice", "", "first")]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();

    feed.edit_post(
        "7",
        PostEdit {
            title: "second".into(),
            content: "new body".into(),
        },
    )
    .await
    .unwrap();

    let snap = feed.store().snapshot().await;
    assert_eq!(snap.posts[0].title, "second");
    assert_eq!(snap.posts[0].content, "new body");
    assert_eq!(snap.posts[0].author, "alice");
    assert!(backend.calls().contains(&"update 7".to_string()));
}

#[tokio::test]
async fn failed_edit_and_delete_keep_local_state() {
    let backend = FakeBackend::with_posts(vec![remote_post(7, "alice", "", "first")]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();
    let before = feed.store().snapshot().await;

    backend.set_failing(true);
    assert!(feed
        .edit_post(
            "7",
            PostEdit {
                title: "x".into(),
                content: "y".into(),
            },
        )
        .await
        .is_err());
    assert!(feed.delete_post("7").await.is_err());

    assert_eq!(feed.store().snapshot().await, before);
}

#[tokio::test]
async fn delete_removes_after_backend_confirms() {
    let backend = FakeBackend::with_posts(vec![remote_post(7, "alice", "", "first")]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();
    feed.store()
        .mutate(|s| s.add_comment("7", "bob", "hi"))
        .await
        .unwrap();

    feed.delete_post("7").await.unwrap();
    assert!(feed.store().snapshot().await.posts.is_empty());
    assert!(backend.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn refresh_keeps_local_comments_votes_and_media() {
    let backend = FakeBackend::with_posts(vec![remote_post(7, "alice", "", "first")]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();
    feed.store()
        .mutate(|s| {
            s.add_comment("7", "bob", "nice");
            s.toggle_like_post("7", Some("bob"));
        })
        .await;

    backend.posts.lock().unwrap()[0].title = "renamed".into();
    feed.refresh().await.unwrap();

    let snap = feed.store().snapshot().await;
    assert_eq!(snap.posts.len(), 1);
    assert_eq!(snap.posts[0].title, "renamed");
    assert_eq!(snap.posts[0].comments[0].text, "nice");
    assert_eq!(snap.posts[0].likes, vec!["bob".to_string()]);
}

#[tokio::test]
async fn refresh_keeps_created_post_media_and_reshares() {
    let backend = FakeBackend::new();
    let feed = online_feed(backend.clone());
    let post = feed.create_post(new_post("hello")).await.unwrap();
    let shared = feed
        .store()
        .mutate(|s| s.reshare_post(&post.id, Some("bob"), Some("look")))
        .await
        .unwrap();

    feed.refresh().await.unwrap();

    let snap = feed.store().snapshot().await;
    assert_eq!(snap.posts.len(), 2);
    let created = snap.posts.iter().find(|p| p.id == post.id).unwrap();
    assert_eq!(created.images, vec!["a.png".to_string()]);
    assert_eq!(created.video_url.as_deref(), Some("https://youtu.be/x"));
    assert!(snap.posts.iter().any(|p| p.id == shared.id));
}

#[tokio::test]
async fn refresh_drops_posts_deleted_remotely() {
    let backend = FakeBackend::with_posts(vec![
        remote_post(1, "alice", "2024-01-01T10:00:00Z", "kept"),
        remote_post(2, "bob", "2024-02-01T10:00:00Z", "gone"),
    ]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();

    backend.posts.lock().unwrap().retain(|p| p.title != "gone");
    assert_eq!(feed.refresh().await.unwrap(), 1);

    let snap = feed.store().snapshot().await;
    let ids: Vec<_> = snap.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1"]);
}

#[tokio::test]
async fn reshares_are_edited_and_deleted_locally_while_online() {
    let backend = FakeBackend::with_posts(vec![remote_post(7, "alice", "", "first")]);
    let feed = online_feed(backend.clone());
    feed.refresh().await.unwrap();
    let shared = feed
        .store()
        .mutate(|s| s.reshare_post("7", Some("bob"), None))
        .await
        .unwrap();

    feed.edit_post(
        &shared.id,
        PostEdit {
            title: "mine now".into(),
            content: "edited".into(),
        },
    )
    .await
    .unwrap();
    let snap = feed.store().snapshot().await;
    let edited = snap.posts.iter().find(|p| p.id == shared.id).unwrap();
    assert_eq!(edited.title, "mine now");

    feed.delete_post(&shared.id).await.unwrap();
    let snap = feed.store().snapshot().await;
    assert!(snap.posts.iter().all(|p| p.id != shared.id));
    assert_eq!(snap.posts.len(), 1);

    assert_eq!(backend.calls(), vec!["list".to_string()]);
}
