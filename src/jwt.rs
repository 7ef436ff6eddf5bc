//! JWT session token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Session token duration: 8 hours.
///
/// The cookie Max-Age is derived from this same constant so the token's
/// expiry claim and the cookie lifetime cannot drift apart.
pub const SESSION_TOKEN_DURATION_SECS: u64 = 8 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user UUID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at (Unix timestamp). Diversifies tokens issued for the
    /// same user within the same expiry window.
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Result of issuing a session token.
#[derive(Debug, Clone)]
pub struct TokenResult {
    /// The JWT token string
    pub token: String,
    /// Token duration in seconds
    pub duration: u64,
}

/// Configuration for JWT operations. Built once at startup from the
/// signing secret and shared read-only across handlers.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for a user.
    pub fn issue_session_token(&self, user_uuid: &str, email: &str) -> Result<TokenResult, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let claims = Claims {
            sub: user_uuid.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + SESSION_TOKEN_DURATION_SECS,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(TokenResult {
            token,
            duration: SESSION_TOKEN_DURATION_SECS,
        })
    }

    /// Validate and decode a session token.
    ///
    /// Expired tokens and tokens with a bad signature are distinct
    /// errors; both must map to a 401, never a 500.
    pub fn validate_session_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e),
            })?;

        Ok(token_data.claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Token is past its expiry claim
    Expired,
    /// Signature mismatch or malformed token
    Invalid(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::Invalid(e) => write!(f, "Invalid token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
