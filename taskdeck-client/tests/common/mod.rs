/// Common test utilities for client integration tests
///
/// This module provides shared infrastructure for client tests:
/// - The real API router over a seeded store, served on a loopback port
/// - A middleware that records every request the client sends
/// - Ad-hoc mock servers for payloads the real API never produces

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::sync::{Arc, Mutex};
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_api::store::{DemoSeed, Store};
use taskdeck_client::{api::ApiClient, config::ClientConfig};
use taskdeck_shared::auth::jwt::{create_token, SessionClaims};
use taskdeck_shared::models::user::User;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Requests seen by a server, as `(method, path)`
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<(Method, String)>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    recorder
        .requests
        .lock()
        .unwrap()
        .push((request.method().clone(), request.uri().path().to_string()));
    next.run(request).await
}

/// Serves `router` on an ephemeral loopback port; returns the API base URL
pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}/api", addr)
}

/// Test context around a running API server
pub struct TestServer {
    pub api_url: String,
    pub store: Arc<Store>,
    pub seed: DemoSeed,
    pub recorder: Recorder,
}

impl TestServer {
    /// Starts the API over a freshly seeded store
    pub async fn start() -> Self {
        let store = Store::new();
        let seed = store.seed_demo().await;

        let state = AppState::new(store, Config::for_secret(TEST_SECRET));
        let store = state.store.clone();

        let recorder = Recorder::default();
        let app = build_router(state).layer(middleware::from_fn_with_state(recorder.clone(), record));
        let api_url = spawn_router(app).await;

        TestServer {
            api_url,
            store,
            seed,
            recorder,
        }
    }

    /// Session token for `user`
    pub fn token(&self, user: &User) -> String {
        create_token(&SessionClaims::new(user.id, user.email.clone()), TEST_SECRET).unwrap()
    }

    /// API client without a session
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ClientConfig::new(&self.api_url)).unwrap()
    }

    /// API client signed in as `user`
    pub fn client_for(&self, user: &User) -> ApiClient {
        let api = self.client();
        api.set_token(Some(self.token(user)));
        api
    }
}
