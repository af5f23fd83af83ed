//! Read access to `training_sessions`.

use sqlx::PgPool;
use trainhub_core::session::{Session, SessionStatus};
use trainhub_core::types::Timestamp;

use crate::models::session::SessionRow;

const COLUMNS: &str = "id, name, scheduled_at, status, user_id, club_id";

pub struct SessionRepo;

impl SessionRepo {
    /// Planned sessions scheduled in `[from, to]`, soonest first.
    pub async fn list_planned_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM training_sessions \
             WHERE status = $1 AND scheduled_at >= $2 AND scheduled_at <= $3 \
             ORDER BY scheduled_at, id"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(SessionStatus::Planned.as_str())
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(SessionRow::into_domain)
            .collect()
    }
}
