//! Handlers for manual job triggers.
//!
//! Each handler runs the job once, immediately, through the scheduler's
//! overlap guard. A trigger that lands while the same job is running gets
//! a 409.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use trainhub_notify::scheduler::{NOTIFICATION_CLEANUP_JOB, TOKEN_CLEANUP_JOB};
use trainhub_notify::ReminderRunReport;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CleanupResult {
    pub job: &'static str,
    pub deleted: u64,
}

/// POST /api/v1/ops/reminders/run
pub async fn run_reminders(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReminderRunReport>>> {
    tracing::info!(user_id = admin.user_id, "Manual reminder run requested");
    let report = state.scheduler.run_reminders_once().await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/ops/cleanup/notifications
pub async fn cleanup_notifications(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CleanupResult>>> {
    tracing::info!(user_id = admin.user_id, "Manual notification cleanup requested");
    let deleted = state.scheduler.run_notification_cleanup_once().await?;
    Ok(Json(DataResponse {
        data: CleanupResult {
            job: NOTIFICATION_CLEANUP_JOB,
            deleted,
        },
    }))
}

/// POST /api/v1/ops/cleanup/push-tokens
pub async fn cleanup_push_tokens(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CleanupResult>>> {
    tracing::info!(user_id = admin.user_id, "Manual push token cleanup requested");
    let deleted = state.scheduler.run_token_cleanup_once().await?;
    Ok(Json(DataResponse {
        data: CleanupResult {
            job: TOKEN_CLEANUP_JOB,
            deleted,
        },
    }))
}
