use trainhub_core::error::CoreError;

use crate::push::PushError;

/// Errors raised inside the notification pipeline.
///
/// None of these reach end users; they are logged per item or per job.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure from a non-SQL storage backend.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Push provider error: {0}")]
    Push(#[from] PushError),

    #[error("Push provider timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A scheduled job was triggered while its previous run was still active.
    #[error("Job {0} is already running")]
    AlreadyRunning(&'static str),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
