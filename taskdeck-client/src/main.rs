//! # TaskDeck Client
//!
//! Headless client: signs in with a pre-issued token, loads the task board and
//! prints a summary.
//!
//! ## Usage
//!
//! ```bash
//! TASKDECK_ACCESS_TOKEN=<token> cargo run -p taskdeck-client
//! ```

use std::sync::Arc;
use taskdeck_client::{
    api::ApiClient,
    board::TaskBoard,
    config::ClientConfig,
    router::{Location, Navigator, Route},
    session::{MemorySessionProvider, Session},
    shortcuts::ShortcutRegistry,
    stores::{AuditStore, AuthStore, TaskStore},
};
use taskdeck_shared::models::task::TaskStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("TaskDeck Client v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env()?;
    let provider = Arc::new(match config.access_token.clone() {
        Some(token) => MemorySessionProvider::with_session(Session::new(token)),
        None => MemorySessionProvider::new(),
    });

    let api = ApiClient::new(&config)?;
    let location = Location::default();
    let auth = AuthStore::new(api.clone(), provider, location.clone());
    auth.init().await;

    let navigator = Navigator::new(auth.clone(), location);
    if navigator.navigate(Route::Tasks).await != Route::Tasks {
        tracing::warn!("Not signed in; set TASKDECK_ACCESS_TOKEN");
        auth.shutdown();
        return Ok(());
    }

    let board = TaskBoard::new(TaskStore::new(api.clone()), auth.clone(), ShortcutRegistry::global());
    board.mount().await;

    if let Some(error) = board.store().error() {
        tracing::error!("{}", error);
    }

    let stats = board.store().stats();
    tracing::info!(total = stats.total, "Tasks loaded");

    let buckets = board.buckets();
    for status in TaskStatus::ALL {
        let count = buckets.bucket(status).len();
        tracing::info!(
            "{}: {} ({:.0}%)",
            TaskBoard::status_label(status),
            count,
            stats.percentage(count)
        );
    }

    if navigator.navigate(Route::Audit).await == Route::Audit {
        let audit = AuditStore::new(api);
        audit.fetch_logs().await;
        for entry in audit.logs().iter().take(10) {
            tracing::info!(action = %entry.action, resource = %entry.resource_type, at = %entry.timestamp, "Audit entry");
        }
    }

    board.unmount();
    auth.shutdown();

    Ok(())
}
