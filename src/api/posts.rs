//! Posts API.
//!
//! Listing is public; everything else requires a valid session. Update
//! and delete additionally require the caller to own the post.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::ApiAuth;
use crate::db::{Database, PostWithAuthor};
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

/// State for posts endpoints.
#[derive(Clone)]
pub struct PostsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(PostsState);

pub fn router(state: PostsState) -> Router {
    Router::new()
        .route("/", get(list_posts))
        .route("/post", post(create_post))
        .route(
            "/{uuid}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct CreatePostRequest {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct UpdatePostRequest {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Serialize)]
struct PostResponse {
    uuid: String,
    title: String,
    content: String,
    author_uuid: String,
    author_name: String,
    created_at: String,
    updated_at: String,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            uuid: p.uuid,
            title: p.title,
            content: p.content,
            author_uuid: p.author_uuid,
            author_name: p.author_name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

// --- Handlers ---

async fn list_posts(State(state): State<PostsState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .db
        .posts()
        .list_all()
        .await
        .db_err("Failed to list posts")?;

    let response: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    Ok(Json(response))
}

async fn create_post(
    State(state): State<PostsState>,
    ApiAuth(user): ApiAuth,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = payload.title.as_deref().unwrap_or("").trim();
    let content = payload.content.as_deref().unwrap_or("");

    if title.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request("Please provide title and content"));
    }

    let uuid = state
        .db
        .posts()
        .create(user.user_id, title, content)
        .await
        .db_err("Failed to create post")?;

    let post = state
        .db
        .posts()
        .get_with_author(&uuid)
        .await
        .db_err("Failed to get created post")?
        .ok_or_else(|| ApiError::internal("Created post not found"))?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

async fn get_post(
    State(state): State<PostsState>,
    ApiAuth(_user): ApiAuth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .db
        .posts()
        .get_with_author(&uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(PostResponse::from(post)))
}

async fn update_post(
    State(state): State<PostsState>,
    ApiAuth(user): ApiAuth,
    Path(uuid): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = payload.title.as_deref().unwrap_or("").trim();
    let content = payload.content.as_deref().unwrap_or("");

    if title.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request("Please provide title and content"));
    }

    let post = state
        .db
        .posts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id != user.user_id {
        return Err(ApiError::forbidden("You can only update your own posts"));
    }

    state
        .db
        .posts()
        .update(post.id, title, content)
        .await
        .db_err("Failed to update post")?;

    let post = state
        .db
        .posts()
        .get_with_author(&uuid)
        .await
        .db_err("Failed to get updated post")?
        .ok_or_else(|| ApiError::internal("Updated post not found"))?;

    Ok(Json(PostResponse::from(post)))
}

async fn delete_post(
    State(state): State<PostsState>,
    ApiAuth(user): ApiAuth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .db
        .posts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id != user.user_id {
        return Err(ApiError::forbidden("You can only delete your own posts"));
    }

    state
        .db
        .posts()
        .delete(post.id)
        .await
        .db_err("Failed to delete post")?;

    Ok(Json(MessageResponse {
        message: "Post deleted",
    }))
}
