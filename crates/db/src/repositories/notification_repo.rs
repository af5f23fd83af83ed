//! Repository for the `notifications` table.

use sqlx::PgPool;
use trainhub_core::notification::{NewNotification, Notification, NotificationKind};
use trainhub_core::types::{DbId, Timestamp};

use crate::models::notification::NotificationRow;

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, user_id, kind, title, message, data, is_read, is_sent, sent_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification and return the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification,
        created_at: Timestamp,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, title, message, data, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationRow>(&query)
            .bind(input.user_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.data)
            .bind(created_at)
            .fetch_one(pool)
            .await?
            .into_domain()
    }

    /// Whether any reminder for `session_id` was created at or after `since`,
    /// whatever its recipient.
    pub async fn reminder_exists_since(
        pool: &PgPool,
        session_id: DbId,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM notifications \
                WHERE kind = $1 \
                  AND data->>'session_id' = $2::text \
                  AND created_at >= $3)",
        )
        .bind(NotificationKind::SessionReminder.as_str())
        .bind(session_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NotificationRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(NotificationRow::into_domain)
            .collect()
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given user and updated.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true \
             WHERE id = $1 AND user_id = $2 AND is_read = false",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record a successful push for a notification.
    pub async fn mark_sent(
        pool: &PgPool,
        notification_id: DbId,
        sent_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notifications SET is_sent = true, sent_at = $2 WHERE id = $1")
            .bind(notification_id)
            .bind(sent_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete read notifications created before `cutoff`. Unread rows are kept
    /// whatever their age.
    pub async fn delete_read_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE is_read = true AND created_at < $1")
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
