//! # TaskDeck API Server Library
//!
//! REST backend for TaskDeck: organization-scoped tasks, the audit log and
//! user self-service, behind bearer session tokens and the role policy.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers
//! - `store`: In-memory organization-scoped store

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;
