//! Cookie-based JWT authentication for API routes.

mod cookie;
mod extractors;

pub use cookie::{SESSION_COOKIE_NAME, clear_session_cookie, get_cookie, session_cookie};
pub use extractors::{ApiAuth, AuthError, AuthenticatedUser, HasAuthState};

/// Implement [`HasAuthState`] for a handler state with `db` and `jwt` fields.
#[macro_export]
macro_rules! impl_has_auth_state {
    ($ty:ty) => {
        impl $crate::auth::HasAuthState for $ty {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn db(&self) -> &$crate::db::Database {
                &self.db
            }
        }
    };
}
