//! # TaskDeck Client Library
//!
//! Client-side state for TaskDeck: an HTTP client for the REST API, reactive
//! stores over `tokio::sync::watch`, route guards and the task board
//! view-model.
//!
//! ## Modules
//!
//! - `api`: REST client carrying the session token
//! - `session`: Identity provider seam
//! - `stores`: Auth, task, audit and settings containers
//! - `router`: Routes, guards and navigation
//! - `board`: Task board view-model
//! - `theme`: Color theme state
//! - `shortcuts`: Keyboard shortcut registry
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskdeck_client::{
//!     api::ApiClient,
//!     config::ClientConfig,
//!     router::{Location, Navigator, Route},
//!     session::{MemorySessionProvider, Session},
//!     stores::{AuthStore, TaskStore},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(&ClientConfig::default())?;
//! let provider = Arc::new(MemorySessionProvider::with_session(Session::new("token")));
//! let location = Location::default();
//! let auth = AuthStore::new(api.clone(), provider, location.clone());
//! auth.init().await;
//!
//! if Navigator::new(auth, location).navigate(Route::Tasks).await == Route::Tasks {
//!     let tasks = TaskStore::new(api);
//!     tasks.fetch_all().await;
//!     println!("{} tasks", tasks.stats().total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod shortcuts;
pub mod stores;
pub mod theme;

pub use error::{ClientError, ClientResult};
