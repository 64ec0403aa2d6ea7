//! # TaskDeck API Server
//!
//! Serves the TaskDeck REST API under `/api`.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p taskdeck-api
//! ```
//!
//! Unless `API_SEED_DEMO=false` (or production mode), a demo organization is
//! seeded and a development session token is logged for each demo user.

use taskdeck_api::{
    app::{build_router, AppState},
    config::Config,
    store::Store,
};
use taskdeck_shared::auth::jwt::{create_token, SessionClaims};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskDeck API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let store = Store::new();

    if config.api.seed_demo {
        let seed = store.seed_demo().await;
        tracing::info!(organization_id = %seed.organization_id, "Seeded demo organization");

        for user in [&seed.owner, &seed.admin, &seed.viewer] {
            let token = create_token(&SessionClaims::new(user.id, user.email.clone()), &config.jwt.secret)?;
            tracing::info!(email = %user.email, role = %user.role, "Development token: {}", token);
        }
    }

    let bind_address = config.bind_address();
    tracing::debug!(origins = ?config.api.cors_origins, "CORS origins");

    let app = build_router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, exiting...");
}
