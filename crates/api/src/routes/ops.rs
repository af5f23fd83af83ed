//! Route definitions for operator job triggers. All require the admin role.

use axum::routing::post;
use axum::Router;

use crate::handlers::ops;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reminders/run", post(ops::run_reminders))
        .route("/cleanup/notifications", post(ops::cleanup_notifications))
        .route("/cleanup/push-tokens", post(ops::cleanup_push_tokens))
}
