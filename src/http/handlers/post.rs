use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    auth::AuthClaims,
    errors::AppError,
    http::extract::JsonBody,
    models::{NewPost, Post, PostView, post::MAX_TITLE_LEN},
    state::AppState,
};

pub async fn list_posts_handler(
    State(state): State<AppState>,
    viewer: Option<AuthClaims>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let viewer_id = viewer.map(|claims| claims.user_id()).transpose()?;

    let posts = state.store.list_posts(viewer_id).await.map_err(|e| {
        tracing::error!("Failed to list posts: {}", e);
        e
    })?;

    Ok(Json(posts))
}

#[derive(Deserialize)]
pub struct CreatePostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    JsonBody(payload): JsonBody<CreatePostPayload>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let user_id = claims.user_id()?;

    if let Some(title) = &payload.title {
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::BadRequest(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
    }

    let post = state
        .store
        .create_post(NewPost {
            title: payload.title,
            content: payload.content,
        })
        .await
        .map_err(|e| {
            tracing::error!("Error creating post: {}", e);
            e
        })?;

    tracing::info!("User {} created post {}", user_id, post.id);

    Ok((StatusCode::CREATED, Json(post)))
}
