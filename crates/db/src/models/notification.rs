//! Notification row model.

use sqlx::FromRow;
use trainhub_core::notification::Notification;
use trainhub_core::types::{DbId, Timestamp};

use super::decode_err;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub is_sent: bool,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl NotificationRow {
    pub fn into_domain(self) -> Result<Notification, sqlx::Error> {
        Ok(Notification {
            id: self.id,
            user_id: self.user_id,
            kind: self.kind.parse().map_err(decode_err)?,
            title: self.title,
            message: self.message,
            data: self.data,
            is_read: self.is_read,
            is_sent: self.is_sent,
            sent_at: self.sent_at,
            created_at: self.created_at,
        })
    }
}
