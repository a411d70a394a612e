//! Common test utilities for integration tests
//!
//! Builds the full router over a fresh `MemoryStore` and drives it through
//! `tower::ServiceExt::oneshot`, so no network or database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use todo_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, JwtConfig},
};
use todo_shared::store::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "correct-horse-1";

/// A registered user and their token
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Test context containing the router and its store
pub struct TestContext {
    pub app: Router,
    pub store: MemoryStore,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: None,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiration_hours: 24,
        },
    }
}

impl TestContext {
    /// Creates a context with an empty in-memory store
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Creates a context over an empty in-memory store with `config`
    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::new();
        let app = build_router(AppState::new(Arc::new(store.clone()), config.clone()));

        Self { app, store, config }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// An empty body comes back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user through the API
    pub async fn register(&self, email: &str) -> TestUser {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email: email.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a todo and returns its JSON
    pub async fn create_todo(&self, user: &TestUser, title: &str) -> Value {
        let (status, body) = self
            .post("/todos", &user.token, serde_json::json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }
}
