//! Repository for the `notification_settings` table.

use sqlx::PgPool;
use trainhub_core::settings::NotificationSettings;
use trainhub_core::types::DbId;

use crate::models::settings::NotificationSettingsRow;

const COLUMNS: &str = "id, user_id, session_reminders, exercise_notifications, \
    system_notifications, reminder_hours, created_at, updated_at";

pub struct NotificationSettingsRepo;

impl NotificationSettingsRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_settings WHERE user_id = $1");
        let row = sqlx::query_as::<_, NotificationSettingsRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Return the user's settings, inserting the column defaults first if the
    /// user has none. Concurrent callers converge on the same row.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationSettings, sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_settings (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM notification_settings WHERE user_id = $1");
        let row = sqlx::query_as::<_, NotificationSettingsRow>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Insert or overwrite every field of a user's settings.
    pub async fn save(
        pool: &PgPool,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_settings \
                (user_id, session_reminders, exercise_notifications, \
                 system_notifications, reminder_hours) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                session_reminders = EXCLUDED.session_reminders, \
                exercise_notifications = EXCLUDED.exercise_notifications, \
                system_notifications = EXCLUDED.system_notifications, \
                reminder_hours = EXCLUDED.reminder_hours, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationSettingsRow>(&query)
            .bind(settings.user_id)
            .bind(settings.session_reminders)
            .bind(settings.exercise_notifications)
            .bind(settings.system_notifications)
            .bind(settings.reminder_hours)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}
