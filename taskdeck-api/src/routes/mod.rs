/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Current user lookup
/// - `tasks`: Task CRUD
/// - `audit`: Audit log read and append
/// - `users`: User self-service updates

pub mod audit;
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
