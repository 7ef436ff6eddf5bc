//! Comments API.
//!
//! Comments are nested under a post: creating one posts to the parent
//! post's UUID. Comments carry no author of their own, so mutation is
//! gated on ownership of the parent post.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::{ApiAuth, AuthenticatedUser};
use crate::db::{Comment, Database, Post};
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

/// State for comments endpoints.
#[derive(Clone)]
pub struct CommentsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(CommentsState);

pub fn router(state: CommentsState) -> Router {
    Router::new()
        .route("/", get(list_comments))
        .route(
            "/{uuid}",
            get(get_comment)
                .post(create_comment)
                .put(update_comment)
                .delete(delete_comment),
        )
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct CommentRequest {
    comment: Option<String>,
}

#[derive(Serialize)]
struct CommentResponse {
    uuid: String,
    comment: String,
    post_uuid: String,
    created_at: String,
    updated_at: String,
}

impl CommentResponse {
    fn new(comment: Comment, post_uuid: String) -> Self {
        Self {
            uuid: comment.uuid,
            comment: comment.content,
            post_uuid,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Serialize)]
struct CommentListEntry {
    uuid: String,
    comment: String,
    post_uuid: String,
    post_title: String,
    created_at: String,
    updated_at: String,
}

// --- Helpers ---

/// Load a comment and its parent post, enforcing that the caller owns
/// the parent. Used by update and delete.
async fn get_owned_comment(
    db: &Database,
    user: &AuthenticatedUser,
    uuid: &str,
) -> Result<(Comment, Post), ApiError> {
    let comment = db
        .comments()
        .get_by_uuid(uuid)
        .await
        .db_err("Failed to get comment")?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let post = db
        .posts()
        .get_by_id(comment.post_id)
        .await
        .db_err("Failed to get parent post")?
        .ok_or_else(|| ApiError::internal("Parent post not found"))?;

    if post.user_id != user.user_id {
        return Err(ApiError::forbidden(
            "You can only modify comments on your own posts",
        ));
    }

    Ok((comment, post))
}

// --- Handlers ---

async fn list_comments(State(state): State<CommentsState>) -> Result<impl IntoResponse, ApiError> {
    let comments = state
        .db
        .comments()
        .list_all()
        .await
        .db_err("Failed to list comments")?;

    let response: Vec<CommentListEntry> = comments
        .into_iter()
        .map(|c| CommentListEntry {
            uuid: c.uuid,
            comment: c.content,
            post_uuid: c.post_uuid,
            post_title: c.post_title,
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
        .collect();

    Ok(Json(response))
}

async fn get_comment(
    State(state): State<CommentsState>,
    ApiAuth(_user): ApiAuth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .db
        .comments()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get comment")?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let post = state
        .db
        .posts()
        .get_by_id(comment.post_id)
        .await
        .db_err("Failed to get parent post")?
        .ok_or_else(|| ApiError::internal("Parent post not found"))?;

    Ok(Json(CommentResponse::new(comment, post.uuid)))
}

/// Create a comment under the post identified by the path UUID.
async fn create_comment(
    State(state): State<CommentsState>,
    ApiAuth(_user): ApiAuth,
    Path(post_uuid): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.comment.as_deref().unwrap_or("").trim();

    if content.is_empty() {
        return Err(ApiError::bad_request("Please provide comment"));
    }

    let post = state
        .db
        .posts()
        .get_by_uuid(&post_uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let uuid = state
        .db
        .comments()
        .create(post.id, content)
        .await
        .db_err("Failed to create comment")?;

    let comment = state
        .db
        .comments()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get created comment")?
        .ok_or_else(|| ApiError::internal("Created comment not found"))?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::new(comment, post.uuid)),
    ))
}

async fn update_comment(
    State(state): State<CommentsState>,
    ApiAuth(user): ApiAuth,
    Path(uuid): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.comment.as_deref().unwrap_or("").trim();

    if content.is_empty() {
        return Err(ApiError::bad_request("Please provide comment"));
    }

    let (comment, post) = get_owned_comment(&state.db, &user, &uuid).await?;

    state
        .db
        .comments()
        .update(comment.id, content)
        .await
        .db_err("Failed to update comment")?;

    let comment = state
        .db
        .comments()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get updated comment")?
        .ok_or_else(|| ApiError::internal("Updated comment not found"))?;

    Ok(Json(CommentResponse::new(comment, post.uuid)))
}

async fn delete_comment(
    State(state): State<CommentsState>,
    ApiAuth(user): ApiAuth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (comment, post) = get_owned_comment(&state.db, &user, &uuid).await?;

    state
        .db
        .comments()
        .delete(comment.id)
        .await
        .db_err("Failed to delete comment")?;

    Ok(Json(CommentResponse::new(comment, post.uuid)))
}
