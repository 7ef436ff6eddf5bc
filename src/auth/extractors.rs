//! Request extractor that authenticates the session cookie.
//!
//! Handlers take [`ApiAuth`] as an argument, so the authentication
//! check always runs before any existence check inside the handler.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::cookie::{SESSION_COOKIE_NAME, get_cookie};
use crate::db::Database;
use crate::jwt::{Claims, JwtConfig, JwtError};

/// Authenticated user information extracted from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Claims from the validated session token
    pub claims: Claims,
    /// Database user ID
    pub user_id: i64,
}

/// Authentication errors, returned as JSON.
#[derive(Debug)]
pub enum AuthError {
    NotAuthenticated,
    InvalidToken,
    SessionExpired,
    UserNotFound,
    DatabaseError,
}

impl AuthError {
    fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotAuthenticated | Self::InvalidToken | Self::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            // A token for a deleted user is treated the same as a bad token.
            Self::UserNotFound => StatusCode::UNAUTHORIZED,
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidToken => "Invalid token",
            Self::SessionExpired => "Session expired",
            Self::UserNotFound => "User not found",
            Self::DatabaseError => "Database error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

/// Trait for state types that support API authentication.
pub trait HasAuthState {
    fn jwt(&self) -> &JwtConfig;
    fn db(&self) -> &Database;
}

/// Extractor for API endpoints that require authentication.
pub struct ApiAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ApiAuth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = get_cookie(&parts.headers, SESSION_COOKIE_NAME)
            .ok_or(AuthError::NotAuthenticated)?;

        let claims = state
            .jwt()
            .validate_session_token(token)
            .map_err(|e| match e {
                JwtError::Expired => AuthError::SessionExpired,
                _ => AuthError::InvalidToken,
            })?;

        let user = state
            .db()
            .users()
            .get_by_uuid(&claims.sub)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user: {}", e);
                AuthError::DatabaseError
            })?
            .ok_or(AuthError::UserNotFound)?;

        Ok(ApiAuth(AuthenticatedUser {
            claims,
            user_id: user.id,
        }))
    }
}
