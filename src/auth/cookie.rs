//! Session cookie handling.
//!
//! The session token travels in a cookie named `token` with fixed
//! attributes. Clearing re-issues the same cookie with an empty value
//! and identical attributes; mismatched attributes on clear vs set
//! would fail to clear the cookie in real browsers.

use axum::http::header;

use crate::jwt::SESSION_TOKEN_DURATION_SECS;

/// Cookie name for the session token.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Build the Set-Cookie value carrying a session token.
///
/// Max-Age matches the token TTL exactly. `Secure` is appended only
/// when the server is configured for HTTPS deployments.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE_NAME, token, SESSION_TOKEN_DURATION_SECS, secure
    )
}

/// Build the Set-Cookie value that clears the session.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_get_cookie_simple() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=abc123"));

        assert_eq!(get_cookie(&headers, "token"), Some("abc123"));
    }

    #[test]
    fn test_get_cookie_multiple() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; token=abc123; theme=dark"),
        );

        assert_eq!(get_cookie(&headers, "token"), Some("abc123"));
        assert_eq!(get_cookie(&headers, "foo"), Some("bar"));
    }

    #[test]
    fn test_get_cookie_not_found() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("foo=bar"));

        assert_eq!(get_cookie(&headers, "token"), None);
    }

    #[test]
    fn test_get_cookie_no_header() {
        let headers = axum::http::HeaderMap::new();
        assert_eq!(get_cookie(&headers, "token"), None);
    }

    #[test]
    fn test_get_cookie_with_spaces() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("  token = abc123  ; foo=bar"),
        );

        assert_eq!(get_cookie(&headers, "token"), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", false);
        assert_eq!(cookie, "token=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=28800");

        let cookie = session_cookie("tok", true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_matches_set_attributes() {
        // Same attributes as the set form, just an empty value.
        assert_eq!(
            clear_session_cookie(false),
            "token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=28800"
        );
    }
}
