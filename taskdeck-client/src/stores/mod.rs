/// Reactive state containers
///
/// Each store is a cheap-to-clone handle over `tokio::sync::watch` cells.
/// Readers call the accessors or subscribe; writers go through the store's
/// async operations, which talk to the REST API.
///
/// # Stores
///
/// - `auth`: signed-in user, loading flag and session token
/// - `task`: cached task collection, loading/error flags and stats
/// - `audit`: audit log entries
/// - `settings`: the current user's settings sub-records

pub mod audit;
pub mod auth;
pub mod settings;
pub mod task;

pub use audit::AuditStore;
pub use auth::AuthStore;
pub use settings::SettingsStore;
pub use task::TaskStore;
