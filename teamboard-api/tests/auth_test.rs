//! Integration tests for accounts and sessions
//!
//! Registration, login cookies, refresh rotation with reuse detection,
//! logout and per-device session management.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{TestContext, PASSWORD};
use serde_json::json;
use teamboard_shared::store::Store;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["store"], "connected");
    assert_eq!(
        response.headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_register_returns_public_user() {
    let ctx = TestContext::new();

    let response = ctx.register("alice").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["statusCode"], 201);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["username"], "alice");
    assert_eq!(response.data()["email"], "alice@example.com");
    assert!(response.data().get("passwordHash").is_none());
    assert!(response.data().get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::new();
    assert_eq!(ctx.register("alice").await.status, StatusCode::CREATED);

    // Same username, different case and email
    let same_username = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": "Alice Again",
                "username": " ALICE ",
                "email": "other@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
    assert_eq!(same_username.body["success"], false);
    assert_eq!(same_username.body["message"], "User already exists");

    // Same email, different username
    let same_email = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": "Alice Clone",
                "username": "alice2",
                "email": "Alice@Example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);

    assert_eq!(ctx.store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": "Bad",
                "username": "ab",
                "email": "not-an-email",
                "password": "short",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password", "username"]);

    let missing = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "username": "bob" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let blank_name = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": "   ",
                "username": "blank",
                "email": "blank@example.com",
                "password": "correct-horse-battery",
            })),
            None,
        )
        .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank_name.body["message"], "Name is required");
    assert!(ctx.login("blank").await.status == StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let response = ctx.login("ALICE").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["user"]["username"], "alice");

    let raw: Vec<&str> = response
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(raw.len(), 2);
    assert!(raw.iter().all(|c| c.contains("HttpOnly") && c.contains("SameSite=Lax")));
    assert!(response.cookie("accessToken").is_some());
    assert!(response.cookie("refreshToken").is_some());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let wrong_password = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "username": "alice", "password": "wrong-password" })),
            None,
        )
        .await;
    let unknown_user = ctx.login("nobody").await;

    for response in [wrong_password, unknown_user] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid username or password");
        assert!(response.cookie("accessToken").is_none());
    }
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/api/myProjects", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);

    let garbage = ctx
        .send(
            Method::GET,
            "/api/dashboard",
            None,
            Some("accessToken=not.a.jwt"),
        )
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("alice").await;

    let request = axum::http::Request::builder()
        .uri("/api/myProjects")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice.access_token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_with_and_without_session() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("alice").await;

    let anonymous = ctx.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(anonymous.data().is_null());
    assert_eq!(anonymous.body["message"], "Not logged in");

    let me = ctx.get("/api/auth/me", &alice).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["id"], alice.id.as_str());
}

#[tokio::test]
async fn test_refresh_rotates_and_detects_reuse() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("alice").await;
    let original = format!("refreshToken={}", alice.refresh_token);

    let rotated = ctx
        .send(Method::POST, "/api/auth/refresh-token", None, Some(&original))
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_eq!(rotated.body["message"], "Token refreshed");
    let new_refresh = rotated.cookie("refreshToken").unwrap();
    let new_access = rotated.cookie("accessToken").unwrap();
    assert_ne!(new_refresh, alice.refresh_token);

    // The new access token works
    let me = ctx
        .send(
            Method::GET,
            "/api/myProjects",
            None,
            Some(&format!("accessToken={new_access}")),
        )
        .await;
    assert_eq!(me.status, StatusCode::OK);

    // Replaying the rotated-out token revokes the whole session
    let replay = ctx
        .send(Method::POST, "/api/auth/refresh-token", None, Some(&original))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);

    let after_reuse = ctx
        .send(
            Method::POST,
            "/api/auth/refresh-token",
            None,
            Some(&format!("refreshToken={new_refresh}")),
        )
        .await;
    assert_eq!(after_reuse.status, StatusCode::UNAUTHORIZED);

    let locked_out = ctx
        .send(
            Method::GET,
            "/api/myProjects",
            None,
            Some(&format!("accessToken={new_access}")),
        )
        .await;
    assert_eq!(locked_out.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_requires_cookie() {
    let ctx = TestContext::new();

    let response = ctx
        .send(Method::POST, "/api/auth/refresh-token", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Refresh token is missing");
}

#[tokio::test]
async fn test_logout_invalidates_access_token() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("alice").await;

    let response = ctx
        .send(
            Method::POST,
            "/api/auth/logout",
            None,
            Some(&alice.cookie_header()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.cookie("accessToken").as_deref(), Some(""));
    assert_eq!(response.cookie("refreshToken").as_deref(), Some(""));

    let after = ctx.get("/api/myProjects", &alice).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let refresh = ctx
        .send(
            Method::POST,
            "/api/auth/refresh-token",
            None,
            Some(&alice.cookie_header()),
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_are_per_device() {
    let ctx = TestContext::new();
    let laptop = ctx.sign_up("alice").await;
    let phone_login = ctx.login("alice").await;
    let phone_cookie = format!(
        "accessToken={}",
        phone_login.cookie("accessToken").unwrap()
    );

    let sessions = ctx.get("/api/auth/sessions", &laptop).await;
    assert_eq!(sessions.status, StatusCode::OK);
    let listed = sessions.data().as_array().unwrap().clone();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.get("refreshTokenHash").is_none()));

    let id = listed[0]["id"].as_str().unwrap();
    let revoke = ctx
        .send(
            Method::DELETE,
            &format!("/api/auth/sessions/{id}"),
            None,
            Some(&laptop.cookie_header()),
        )
        .await;
    assert_eq!(revoke.status, StatusCode::OK);

    // Exactly one device is signed out; the other still sees one session
    let from_laptop = ctx.get("/api/auth/sessions", &laptop).await;
    let from_phone = ctx
        .send(Method::GET, "/api/auth/sessions", None, Some(&phone_cookie))
        .await;
    let (survivor, revoked) = if from_laptop.status == StatusCode::OK {
        (from_laptop, from_phone)
    } else {
        (from_phone, from_laptop)
    };
    assert_eq!(survivor.status, StatusCode::OK);
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
    assert_eq!(survivor.data().as_array().unwrap().len(), 1);
    assert_ne!(survivor.data()[0]["id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn test_revoke_session_errors() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("alice").await;
    let bob = ctx.sign_up("bob").await;

    let bobs = ctx.get("/api/auth/sessions", &bob).await;
    let bob_session = bobs.data()[0]["id"].as_str().unwrap().to_string();

    let foreign = ctx
        .send(
            Method::DELETE,
            &format!("/api/auth/sessions/{bob_session}"),
            None,
            Some(&alice.cookie_header()),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let malformed = ctx
        .send(
            Method::DELETE,
            "/api/auth/sessions/not-a-uuid",
            None,
            Some(&alice.cookie_header()),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    assert_eq!(ctx.get("/api/myTask", &bob).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_users_and_profile() {
    let ctx = TestContext::new();
    let carol = ctx.sign_up("carol").await;
    let alice = ctx.sign_up("alice").await;

    let users = ctx.get("/api/auth/users", &carol).await;
    assert_eq!(users.status, StatusCode::OK);
    let names: Vec<&str> = users
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "carol"]);
    assert!(users.data()[0].get("name").is_none());

    let project_id = ctx.create_project(&alice, "Apollo", &[&carol]).await;
    ctx.accept_all(&carol).await;

    let profile = ctx.get("/api/auth/profile", &carol).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.data()["user"]["username"], "carol");
    assert_eq!(profile.data()["projects"][0]["id"], project_id.as_str());
    assert_eq!(profile.data()["projects"][0]["teamLead"], alice.id.as_str());
}
