//! # TaskDeck Shared Library
//!
//! Types and business rules shared by the TaskDeck API server and client.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks, audit log entries and settings
//! - `auth`: Session tokens, bearer middleware and the role policy
//! - `view`: Task list filtering, sorting and board grouping

pub mod auth;
pub mod models;
pub mod view;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
