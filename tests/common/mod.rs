#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header::SET_COOKIE},
};
use rookery::{ServerConfig, create_app, db::Database, jwt::JwtConfig};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret-of-sufficient-length";

/// Create a test app backed by an in-memory database.
pub async fn create_test_app() -> (Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_JWT_SECRET.to_vec(),
        secure_cookies: false,
    };
    (create_app(&config), db, JwtConfig::new(TEST_JWT_SECRET))
}

/// Send a JSON request, optionally with a Cookie header.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Send a bodyless request, optionally with a Cookie header.
pub async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Extract the `name=value` pair from the response's Set-Cookie header.
pub fn set_cookie_pair(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    Some(header.split(';').next()?.trim().to_string())
}

/// Full Set-Cookie header value, for attribute assertions.
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    Some(response.headers().get(SET_COOKIE)?.to_str().ok()?.to_string())
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up a user and return (user uuid, session cookie pair).
pub async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (String, String) {
    let body = serde_json::json!({ "name": name, "email": email, "password": password });
    let response = send_json(app, "POST", "/api/auth/signup", &body.to_string(), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = set_cookie_pair(&response).expect("signup should set a session cookie");
    let json = body_json(response).await;
    let uuid = json["uuid"].as_str().expect("signup returns a uuid").to_string();
    (uuid, cookie)
}

/// Create a post as the given session and return its uuid.
pub async fn create_post(app: &Router, cookie: &str, title: &str, content: &str) -> String {
    let body = serde_json::json!({ "title": title, "content": content });
    let response = send_json(
        app,
        "POST",
        "/api/posts/post",
        &body.to_string(),
        Some(cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["uuid"].as_str().expect("post has a uuid").to_string()
}
