//! Trainhub notification service library.
//!
//! Exposes configuration, state, error handling and the operator routes so
//! integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
