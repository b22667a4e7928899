//! Common test utilities for integration tests
//!
//! Every test builds the full router over a fresh in-memory store and drives
//! it request by request with `tower::ServiceExt::oneshot`; no external
//! services are needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use teamboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamboard_shared::store::{MemoryStore, Store};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of the envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `name=value` pairs from every `Set-Cookie` header
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::to_string)
            .collect()
    }

    /// Value of one cookie set by this response
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies().into_iter().find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

/// A logged-in user
#[derive(Debug, Clone)]
pub struct Client {
    pub id: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Client {
    /// `Cookie` header carrying both tokens
    pub fn cookie_header(&self) -> String {
        format!(
            "accessToken={}; refreshToken={}",
            self.access_token, self.refresh_token
        )
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "JWT_SECRET" => Some("integration-test-secret-key-32-bytes-min".to_string()),
        "CORS_ORIGINS" => Some("*".to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();
        let app = build_router(AppState::new(shared, test_config()));

        Self { app, store }
    }

    /// Sends a request with an optional JSON body and `Cookie` header
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, client: &Client) -> TestResponse {
        self.send(Method::GET, uri, None, Some(&client.cookie_header()))
            .await
    }

    pub async fn post(&self, uri: &str, body: Value, client: &Client) -> TestResponse {
        self.send(Method::POST, uri, Some(body), Some(&client.cookie_header()))
            .await
    }

    pub async fn patch(&self, uri: &str, body: Value, client: &Client) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body), Some(&client.cookie_header()))
            .await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": format!("{username} tester"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            })),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "username": username, "password": PASSWORD })),
            None,
        )
        .await
    }

    /// Registers and logs in a user
    pub async fn sign_up(&self, username: &str) -> Client {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

        let login = self.login(username).await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);

        Client {
            id: registered.data()["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            access_token: login.cookie("accessToken").unwrap(),
            refresh_token: login.cookie("refreshToken").unwrap(),
        }
    }

    /// Creates a project led by `lead` inviting `members`; returns its ID
    pub async fn create_project(&self, lead: &Client, name: &str, members: &[&Client]) -> String {
        let ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();
        let created = self
            .post(
                "/api/createProject",
                json!({
                    "name": name,
                    "dueDate": "2025-01-01",
                    "members": ids,
                }),
                lead,
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
        created.data()["id"].as_str().unwrap().to_string()
    }

    /// Accepts every pending invitation of `client`
    pub async fn accept_all(&self, client: &Client) {
        let pending = self.get("/api/requests", client).await;
        for invitation in pending.data().as_array().unwrap() {
            let answered = self
                .post(
                    "/api/respond",
                    json!({ "invitationId": invitation["id"], "response": "accepted" }),
                    client,
                )
                .await;
            assert_eq!(answered.status, StatusCode::OK, "{:?}", answered.body);
        }
    }
}
