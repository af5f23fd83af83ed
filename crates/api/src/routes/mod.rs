pub mod health;
pub mod ops;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ops/reminders/run                 POST   run one reminder cycle
/// /ops/cleanup/notifications         POST   purge old read notifications
/// /ops/cleanup/push-tokens           POST   purge stale inactive tokens
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/ops", ops::router())
}
