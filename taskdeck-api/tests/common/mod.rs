/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A router over a freshly seeded in-memory store
/// - Session token generation per demo user
/// - Request/response helpers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_api::store::{DemoSeed, Store};
use taskdeck_shared::auth::jwt::{create_token, SessionClaims};
use taskdeck_shared::models::user::User;
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<Store>,
    pub config: Config,
    pub seed: DemoSeed,
}

impl TestContext {
    /// Creates a new test context over a seeded store
    pub async fn new() -> Self {
        let config = Config::for_secret(TEST_SECRET);
        let store = Store::new();
        let seed = store.seed_demo().await;

        let state = AppState::new(store, config.clone());
        let store = state.store.clone();
        let app = build_router(state);

        TestContext {
            app,
            store,
            config,
            seed,
        }
    }

    /// Returns the authorization header value for `user`
    pub fn auth_header(&self, user: &User) -> String {
        let token = create_token(&SessionClaims::new(user.id, user.email.clone()), &self.config.jwt.secret)
            .expect("token");
        format!("Bearer {}", token)
    }

    /// Sends a request as `user` (or anonymously) and returns status and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, self.auth_header(user));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().call(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
