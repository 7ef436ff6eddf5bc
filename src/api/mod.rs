mod auth;
mod comments;
mod error;
mod posts;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, secure_cookies: bool) -> Router {
    let auth_state = auth::AuthState {
        db: db.clone(),
        jwt: jwt.clone(),
        secure_cookies,
    };

    let posts_state = posts::PostsState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let comments_state = comments::CommentsState { db, jwt };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest("/posts", posts::router(posts_state))
        .nest("/comments", comments::router(comments_state))
}
