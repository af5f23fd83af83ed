use sqlx::FromRow;
use trainhub_core::settings::NotificationSettings;
use trainhub_core::types::{DbId, Timestamp};

/// A row from the `notification_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationSettingsRow {
    pub id: DbId,
    pub user_id: DbId,
    pub session_reminders: bool,
    pub exercise_notifications: bool,
    pub system_notifications: bool,
    pub reminder_hours: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<NotificationSettingsRow> for NotificationSettings {
    fn from(row: NotificationSettingsRow) -> Self {
        Self {
            user_id: row.user_id,
            session_reminders: row.session_reminders,
            exercise_notifications: row.exercise_notifications,
            system_notifications: row.system_notifications,
            reminder_hours: row.reminder_hours,
        }
    }
}
