/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::{build_router, AppState}, config::Config, store::Store};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Store::new(), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, store::Store};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use taskdeck_shared::{auth::middleware::authenticate, models::user::User};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// In-memory data store
    pub store: Arc<Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Gets the secret used to verify session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// The signed-in user, resolved from the session token by the auth layer
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// └── /api/                     # Bearer-authenticated API
///     ├── GET    /auth/me       # Current user record
///     ├── GET    /tasks         # List organization tasks
///     ├── POST   /tasks         # Create task
///     ├── PUT    /tasks/:id     # Update task
///     ├── DELETE /tasks/:id     # Delete task
///     ├── GET    /audit-log     # Organization audit log (Admin, Owner)
///     ├── POST   /audit-log     # Append client audit entry
///     └── PUT    /users/:id     # Update own profile/security/preferences
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (everything under `/api`)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let api_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/audit-log",
            get(routes::audit::list_audit_log).post(routes::audit::create_audit_entry),
        )
        .route("/users/:id", put(routes::users::update_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Builds the CORS layer from the configured origins
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Bearer authentication layer
///
/// Validates the session token, then resolves the user record and injects
/// both the `AuthContext` and the [`CurrentUser`] into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    let user = state
        .store
        .find_user(auth_context.user_id)
        .await
        .ok_or_else(|| ApiError::Unauthorized("User profile not found".to_string()))?;

    tracing::trace!(user_id = %user.id, role = %user.role, "Authenticated request");

    req.extensions_mut().insert(auth_context);
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Store::new(), Config::for_secret("test-secret-key-at-least-32-bytes-long"));
        assert_eq!(state.jwt_secret(), "test-secret-key-at-least-32-bytes-long");
    }

    #[test]
    fn test_cors_layer_builds() {
        let mut config = Config::for_secret("test-secret-key-at-least-32-bytes-long");
        let _ = cors_layer(&config);

        config.api.cors_origins = vec!["*".to_string()];
        let _ = cors_layer(&config);
    }
}
