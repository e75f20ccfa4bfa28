//! The canonical in-memory feed: one display name plus the ordered posts and
//! their comments. Every change goes through the methods below; lookups that
//! miss and unauthenticated votes leave the state untouched.

pub mod ids;
pub mod shared;
pub mod votes;

use std::fmt;
use std::sync::Arc;

use crate::models::{Comment, NewPost, Post, PostEdit, Snapshot};

pub use ids::{Clock, ManualClock, SystemClock};
pub use shared::SharedStore;
pub use votes::Vote;

const RESHARE_PREFIX: &str = "Reshared: ";

pub struct Store {
    username: Option<String>,
    posts: Vec<Post>,
    clock: Arc<dyn Clock>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("username", &self.username)
            .field("posts", &self.posts.len())
            .finish()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            username: None,
            posts: Vec::new(),
            clock,
        }
    }

    // --- Reads ---

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            username: self.username.clone(),
            posts: self.posts.clone(),
        }
    }

    // --- Session ---

    pub fn set_username(&mut self, name: Option<String>) {
        self.username = name;
    }

    // --- Posts ---

    /// Replace the whole collection, newest first.
    pub fn set_posts(&mut self, mut posts: Vec<Post>) {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.posts = posts;
    }

    /// Fold a fresh backend list into the collection, newest first.
    ///
    /// Posts already held keep their comments, votes, media and shared
    /// comment, since the backend stores none of those. Local-only posts stay.
    /// Backend posts missing from `incoming` were deleted remotely and go.
    pub fn merge_posts(&mut self, mut incoming: Vec<Post>) {
        let mut previous = std::mem::take(&mut self.posts);

        for post in &mut incoming {
            if let Some(pos) = previous.iter().position(|p| p.id == post.id) {
                let existing = previous.remove(pos);
                post.comments = existing.comments;
                post.likes = existing.likes;
                post.dislikes = existing.dislikes;
                post.images = existing.images;
                post.video_url = existing.video_url;
                post.shared_comment = existing.shared_comment;
            }
        }

        incoming.extend(previous.into_iter().filter(|p| !p.remote));
        self.set_posts(incoming);
    }

    pub fn create_post(&mut self, new: NewPost) -> Post {
        let now = self.clock.now_ms();
        let post = Post {
            id: ids::generate_id(now),
            title: new.title,
            content: new.content,
            author: new.author,
            created_at: now,
            comments: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            images: new.images,
            video_url: new.video_url,
            shared_comment: None,
            remote: false,
        };
        tracing::debug!(post_id = %post.id, author = %post.author, "post created");
        self.posts.insert(0, post.clone());
        post
    }

    /// Prepend a post built elsewhere, e.g. one confirmed by the backend.
    /// A post already holding the same id is replaced.
    pub fn adopt_post(&mut self, post: Post) {
        self.posts.retain(|p| p.id != post.id);
        tracing::debug!(post_id = %post.id, "post adopted");
        self.posts.insert(0, post);
    }

    pub fn edit_post(&mut self, id: &str, edit: PostEdit) {
        if let Some(post) = self.post_mut(id) {
            post.title = edit.title;
            post.content = edit.content;
        }
    }

    pub fn delete_post(&mut self, id: &str) {
        self.posts.retain(|p| p.id != id);
    }

    /// Copy `post_id` into a new post authored by `by`. Returns the new post,
    /// or `None` when `by` is absent or the original does not exist.
    pub fn reshare_post(
        &mut self,
        post_id: &str,
        by: Option<&str>,
        comment: Option<&str>,
    ) -> Option<Post> {
        let by = by?;
        let original = self.post(post_id)?;
        let now = self.clock.now_ms();

        let post = Post {
            id: ids::generate_id(now),
            title: format!("{}{}", RESHARE_PREFIX, original.title),
            content: original.content.clone(),
            author: by.to_string(),
            created_at: now,
            comments: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            images: original.images.clone(),
            video_url: original.video_url.clone(),
            shared_comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
            remote: false,
        };
        tracing::debug!(post_id = %post.id, original = %post_id, by = %by, "post reshared");
        self.posts.insert(0, post.clone());
        Some(post)
    }

    pub fn toggle_like_post(&mut self, post_id: &str, username: Option<&str>) {
        self.vote_post(post_id, username, Vote::Like);
    }

    pub fn toggle_dislike_post(&mut self, post_id: &str, username: Option<&str>) {
        self.vote_post(post_id, username, Vote::Dislike);
    }

    // --- Comments ---

    pub fn add_comment(&mut self, post_id: &str, author: &str, text: &str) -> Option<Comment> {
        let now = self.clock.now_ms();
        let post = self.post_mut(post_id)?;
        let comment = Comment {
            id: ids::generate_id(now),
            author: author.to_string(),
            text: text.to_string(),
            created_at: now,
            likes: Vec::new(),
            dislikes: Vec::new(),
        };
        post.comments.push(comment.clone());
        tracing::debug!(post_id = %post_id, comment_id = %comment.id, "comment added");
        Some(comment)
    }

    pub fn edit_comment(&mut self, post_id: &str, comment_id: &str, text: &str) {
        if let Some(comment) = self.comment_mut(post_id, comment_id) {
            comment.text = text.to_string();
        }
    }

    pub fn delete_comment(&mut self, post_id: &str, comment_id: &str) {
        if let Some(post) = self.post_mut(post_id) {
            post.comments.retain(|c| c.id != comment_id);
        }
    }

    pub fn toggle_like_comment(&mut self, post_id: &str, comment_id: &str, username: Option<&str>) {
        self.vote_comment(post_id, comment_id, username, Vote::Like);
    }

    pub fn toggle_dislike_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        username: Option<&str>,
    ) {
        self.vote_comment(post_id, comment_id, username, Vote::Dislike);
    }

    // --- Helpers ---

    fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    fn comment_mut(&mut self, post_id: &str, comment_id: &str) -> Option<&mut Comment> {
        self.post_mut(post_id)?
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
    }

    fn vote_post(&mut self, post_id: &str, username: Option<&str>, vote: Vote) {
        let Some(user) = username else { return };
        if let Some(post) = self.post_mut(post_id) {
            votes::toggle(&mut post.likes, &mut post.dislikes, user, vote);
        }
    }

    fn vote_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        username: Option<&str>,
        vote: Vote,
    ) {
        let Some(user) = username else { return };
        if let Some(comment) = self.comment_mut(post_id, comment_id) {
            votes::toggle(&mut comment.likes, &mut comment.dislikes, user, vote);
        }
    }
}
