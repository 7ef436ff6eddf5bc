//! Authentication API: signup, signin, logout.
//!
//! Signup and signin respond with the public user projection and a
//! `Set-Cookie` carrying the session token. The full user record,
//! including the password hash, never leaves the handler.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::{SESSION_COOKIE_NAME, clear_session_cookie, get_cookie, session_cookie};
use crate::db::{Database, User};
use crate::jwt::JwtConfig;
use crate::password;

/// State for authentication endpoints.
#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub secure_cookies: bool,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct SignupRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct SigninRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Public user projection. Excludes the password hash and internal ID.
#[derive(Serialize)]
struct UserResponse {
    uuid: String,
    name: String,
    email: String,
    created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

// --- Handlers ---

async fn signup(
    State(state): State<AuthState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.as_deref().unwrap_or("").trim();
    let email = payload.email.as_deref().unwrap_or("").trim();
    let password = payload.password.as_deref().unwrap_or("");

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request(
            "Please provide name, email and password",
        ));
    }

    // Friendlier message ahead of the insert; the UNIQUE constraint is
    // what actually decides the race.
    let available = state
        .db
        .users()
        .is_email_available(email)
        .await
        .db_err("Failed to check email availability")?;

    if !available {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = password::hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Failed to process password")
    })?;

    let uuid = uuid::Uuid::new_v4().to_string();

    let id = state
        .db
        .users()
        .create(&uuid, name, email, &password_hash)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                ApiError::conflict("User already exists")
            } else {
                ApiError::db_error("Failed to create user", e)
            }
        })?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to get created user")?
        .ok_or_else(|| ApiError::internal("Created user not found"))?;

    let token = state.jwt.issue_session_token(&user.uuid, &user.email).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    let cookie = session_cookie(&token.token, state.secure_cookies);

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

async fn signin(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(payload): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.as_deref().unwrap_or("").trim();
    let password = payload.password.as_deref().unwrap_or("");

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    // No re-login while a session cookie is present.
    if get_cookie(&headers, SESSION_COOKIE_NAME).is_some() {
        return Err(ApiError::bad_request("You are already logged in"));
    }

    let user = state
        .db
        .users()
        .get_by_email(email)
        .await
        .db_err("Failed to get user")?;

    // Same message whether the email is unknown or the password is
    // wrong, so responses do not reveal which emails are registered.
    let Some(user) = user else {
        return Err(ApiError::unauthorized("Email or password is incorrect"));
    };

    let matches = password::verify_password(password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal("Failed to verify password")
    })?;

    if !matches {
        return Err(ApiError::unauthorized("Email or password is incorrect"));
    }

    let token = state.jwt.issue_session_token(&user.uuid, &user.email).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    let cookie = session_cookie(&token.token, state.secure_cookies);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if get_cookie(&headers, SESSION_COOKIE_NAME).is_none() {
        return Err(ApiError::bad_request("No user logged in"));
    }

    // Re-issue the cookie with an empty value and the same attributes.
    // The server keeps no session state, so this is the whole logout.
    let cookie = clear_session_cookie(state.secure_cookies);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logged out",
        }),
    ))
}
