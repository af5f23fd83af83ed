use sqlx::FromRow;
use trainhub_core::push::PushToken;
use trainhub_core::types::{DbId, Timestamp};

use super::decode_err;

/// A row from the `push_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct PushTokenRow {
    pub id: DbId,
    pub user_id: DbId,
    pub platform: String,
    pub token: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PushTokenRow {
    pub fn into_domain(self) -> Result<PushToken, sqlx::Error> {
        Ok(PushToken {
            id: self.id,
            user_id: self.user_id,
            platform: self.platform.parse().map_err(decode_err)?,
            token: self.token,
            is_active: self.is_active,
            updated_at: self.updated_at,
        })
    }
}
