use std::sync::Arc;

use trainhub_notify::Scheduler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used by the health check.
    pub pool: trainhub_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Runs jobs on demand behind the same overlap guards as the background loops.
    pub scheduler: Scheduler,
}
