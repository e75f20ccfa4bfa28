use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::models::{NewPost, Post, PostEdit, ANONYMOUS, MAX_IMAGES};
use crate::routes::{find_post, non_empty, require_owner};
use crate::state::AppState;
use crate::store::Vote;

// --- Bodies ---

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostBody {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditPostBody {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReshareBody {
    pub comment: Option<String>,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", post(create_post))
        .route("/api/posts/{id}", patch(edit_post).delete(delete_post))
        .route("/api/posts/{id}/like", post(like_post))
        .route("/api/posts/{id}/dislike", post(dislike_post))
        .route("/api/posts/{id}/reshare", post(reshare_post))
}

/// Validate a create request and fill in the defaults the form would apply.
///
/// A post needs at least one of title, content, images or a video. A missing
/// title becomes "Video post by @user" or "Untitled post by @user".
pub fn prepare_new_post(body: CreatePostBody, username: Option<&str>) -> AppResult<NewPost> {
    let title = body.title.trim().to_string();
    let content = body.content.trim().to_string();
    let images: Vec<String> = body
        .images
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    let video_url = body
        .video_url
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    if title.is_empty() && content.is_empty() && images.is_empty() && video_url.is_none() {
        return Err(AppError::BadRequest(
            "Post needs a title, content or media".into(),
        ));
    }
    if images.len() > MAX_IMAGES {
        return Err(AppError::BadRequest(format!(
            "A post can hold at most {} images",
            MAX_IMAGES
        )));
    }

    let author = username.unwrap_or(ANONYMOUS).to_string();
    let title = if !title.is_empty() {
        title
    } else if video_url.is_some() {
        format!("Video post by @{}", author)
    } else {
        format!("Untitled post by @{}", author)
    };

    Ok(NewPost {
        title,
        content,
        author,
        images,
        video_url,
    })
}

// --- Handlers ---

async fn create_post(
    State(state): State<AppState>,
    user: MaybeUser,
    Json(body): Json<CreatePostBody>,
) -> AppResult<Response> {
    let new = prepare_new_post(body, user.username())?;
    let post = state.feed.create_post(new).await?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

async fn edit_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<EditPostBody>,
) -> AppResult<Json<Post>> {
    let title = non_empty(&body.title, "Title cannot be empty")?;
    let existing = find_post(&state, &id).await?;
    require_owner(&existing.author, &user.username)?;

    state
        .feed
        .edit_post(
            &id,
            PostEdit {
                title,
                content: body.content.trim().to_string(),
            },
        )
        .await?;

    Ok(Json(find_post(&state, &id).await?))
}

async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let existing = find_post(&state, &id).await?;
    require_owner(&existing.author, &user.username)?;

    state.feed.delete_post(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn like_post(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    vote(&state, &id, user.username(), Vote::Like).await
}

async fn dislike_post(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    vote(&state, &id, user.username(), Vote::Dislike).await
}

/// Without a username the store ignores the vote; the post comes back as is.
async fn vote(
    state: &AppState,
    id: &str,
    username: Option<&str>,
    vote: Vote,
) -> AppResult<Json<Post>> {
    find_post(state, id).await?;
    state
        .store()
        .mutate(|s| match vote {
            Vote::Like => s.toggle_like_post(id, username),
            Vote::Dislike => s.toggle_dislike_post(id, username),
        })
        .await;
    Ok(Json(find_post(state, id).await?))
}

async fn reshare_post(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
    Json(body): Json<ReshareBody>,
) -> AppResult<Response> {
    find_post(&state, &id).await?;
    let comment = body
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let shared = state
        .store()
        .mutate(|s| s.reshare_post(&id, user.username(), comment.as_deref()))
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok((StatusCode::CREATED, Json(shared)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(title: &str, content: &str) -> CreatePostBody {
        CreatePostBody {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_trimmed_title_and_content() {
        let new = prepare_new_post(body("  Hi ", " there "), Some("alice")).unwrap();
        assert_eq!(new.title, "Hi");
        assert_eq!(new.content, "there");
        assert_eq!(new.author, "alice");
    }

    #[test]
    fn empty_post_is_rejected() {
        let err = prepare_new_post(body(" ", ""), Some("alice")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn missing_title_falls_back_to_untitled() {
        let new = prepare_new_post(body("", "text"), Some("alice")).unwrap();
        assert_eq!(new.title, "Untitled post by @alice");
    }

    #[test]
    fn video_only_post_gets_video_title() {
        let new = prepare_new_post(
            CreatePostBody {
                video_url: Some("https://youtu.be/abc".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(new.title, "Video post by @Anonymous");
        assert_eq!(new.author, ANONYMOUS);
        assert_eq!(new.video_url.as_deref(), Some("https://youtu.be/abc"));
    }

    #[test]
    fn too_many_images_rejected() {
        let err = prepare_new_post(
            CreatePostBody {
                title: "t".into(),
                images: (0..=MAX_IMAGES).map(|i| format!("img{}", i)).collect(),
                ..Default::default()
            },
            Some("alice"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn blank_images_are_dropped() {
        let new = prepare_new_post(
            CreatePostBody {
                images: vec!["a.png".into(), "  ".into()],
                ..Default::default()
            },
            Some("bob"),
        )
        .unwrap();
        assert_eq!(new.images, vec!["a.png".to_string()]);
        assert_eq!(new.title, "Untitled post by @bob");
    }
}
