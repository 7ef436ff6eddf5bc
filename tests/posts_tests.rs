//! Tests for the Posts API.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_post, create_test_app, send, send_json, signup};
use rookery::jwt::Claims;
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::test]
async fn test_list_posts_is_public_and_empty() {
    let (app, _db, _jwt) = create_test_app().await;

    let response = send(&app, "GET", "/api/posts", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_post_requires_auth() {
    let (app, _db, _jwt) = create_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/posts/post",
        r#"{"title": "T", "content": "C"}"#,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_missing_fields() {
    let (app, _db, _jwt) = create_test_app().await;
    let (_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;

    for body in [
        r#"{"content": "C"}"#,
        r#"{"title": "T"}"#,
        r#"{"title": "", "content": "C"}"#,
    ] {
        let response = send_json(&app, "POST", "/api/posts/post", body, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn test_created_post_is_owned_by_caller() {
    let (app, _db, _jwt) = create_test_app().await;
    let (user_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;

    let response = send_json(
        &app,
        "POST",
        "/api/posts/post",
        r#"{"title": "T", "content": "C"}"#,
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["title"], "T");
    assert_eq!(json["content"], "C");
    assert_eq!(json["author_uuid"], user_uuid.as_str());
    assert_eq!(json["author_name"], "Alice");
}

#[tokio::test]
async fn test_get_post_checks_auth_before_existence() {
    let (app, _db, _jwt) = create_test_app().await;

    // Nonexistent post without a session: the auth failure wins.
    let response = send(&app, "GET", "/api/posts/no-such-uuid", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;
    let response = send(&app, "GET", "/api/posts/no-such-uuid", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_post_with_garbage_token() {
    let (app, _db, _jwt) = create_test_app().await;

    let response = send(&app, "GET", "/api/posts/no-such-uuid", Some("token=garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_post_with_expired_token() {
    let (app, _db, _jwt) = create_test_app().await;
    let (user_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;
    let post_uuid = create_post(&app, &cookie, "T", "C").await;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        sub: user_uuid,
        email: "alice@example.com".to_string(),
        iat: now - 100,
        exp: now - 50,
    };
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(common::TEST_JWT_SECRET),
    )
    .unwrap();

    let response = send(
        &app,
        "GET",
        &format!("/api/posts/{}", post_uuid),
        Some(&format!("token={}", expired)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_post() {
    let (app, _db, _jwt) = create_test_app().await;
    let (_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;
    let post_uuid = create_post(&app, &cookie, "T", "C").await;

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/posts/{}", post_uuid),
        r#"{"title": "New title", "content": "New content"}"#,
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "New title");
    assert_eq!(json["content"], "New content");
}

#[tokio::test]
async fn test_update_post_not_owner() {
    let (app, _db, _jwt) = create_test_app().await;
    let (_alice, alice_cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;
    let (_bob, bob_cookie) = signup(&app, "Bob", "bob@example.com", "hunter2").await;

    let post_uuid = create_post(&app, &alice_cookie, "T", "C").await;

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/posts/{}", post_uuid),
        r#"{"title": "Hijacked", "content": "X"}"#,
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        "DELETE",
        &format!("/api/posts/{}", post_uuid),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_post_not_found() {
    let (app, _db, _jwt) = create_test_app().await;
    let (_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;

    let response = send_json(
        &app,
        "PUT",
        "/api/posts/no-such-uuid",
        r#"{"title": "T", "content": "C"}"#,
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// End-to-end flow: signup, failed signin, signin, create, read
/// unauthenticated, delete as owner, read back.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let (app, _db, _jwt) = create_test_app().await;

    // Signup sets a cookie.
    let response = send_json(
        &app,
        "POST",
        "/api/auth/signup",
        r#"{"name": "A", "email": "a@x.com", "password": "pw"}"#,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_uuid = body_json(response).await["uuid"].as_str().unwrap().to_string();

    // Wrong password fails.
    let response = send_json(
        &app,
        "POST",
        "/api/auth/signin",
        r#"{"email": "a@x.com", "password": "nope"}"#,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password issues a fresh cookie.
    let response = send_json(
        &app,
        "POST",
        "/api/auth/signin",
        r#"{"email": "a@x.com", "password": "pw"}"#,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = common::set_cookie_pair(&response).unwrap();

    // Create a post owned by the signed-in user.
    let response = send_json(
        &app,
        "POST",
        "/api/posts/post",
        r#"{"title": "T", "content": "C"}"#,
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["author_uuid"], user_uuid.as_str());
    let post_uuid = json["uuid"].as_str().unwrap().to_string();

    // Reading by id without a cookie is rejected.
    let response = send(&app, "GET", &format!("/api/posts/{}", post_uuid), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The owner deletes it.
    let response = send(
        &app,
        "DELETE",
        &format!("/api/posts/{}", post_uuid),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Now it is gone.
    let response = send(
        &app,
        "GET",
        &format!("/api/posts/{}", post_uuid),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_posts_includes_author_info() {
    let (app, _db, _jwt) = create_test_app().await;
    let (user_uuid, cookie) = signup(&app, "Alice", "alice@example.com", "hunter2").await;
    create_post(&app, &cookie, "T", "C").await;

    let response = send(&app, "GET", "/api/posts", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let posts = json.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["author_uuid"], user_uuid.as_str());
    // The public listing never includes credential material.
    assert!(posts[0].get("password_hash").is_none());
}
