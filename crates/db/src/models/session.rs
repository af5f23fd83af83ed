//! Read-only rows from the training application's tables.

use sqlx::FromRow;
use trainhub_core::session::{Member, Session};
use trainhub_core::types::{DbId, Timestamp};

use super::decode_err;

/// A row from the `training_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub name: String,
    pub scheduled_at: Timestamp,
    pub status: String,
    pub user_id: DbId,
    pub club_id: Option<DbId>,
}

impl SessionRow {
    pub fn into_domain(self) -> Result<Session, sqlx::Error> {
        Ok(Session {
            id: self.id,
            name: self.name,
            scheduled_at: self.scheduled_at,
            status: self.status.parse().map_err(decode_err)?,
            user_id: self.user_id,
            club_id: self.club_id,
        })
    }
}

/// A user id and display name, from `users` (optionally joined with `club_members`).
#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub user_id: DbId,
    pub name: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
        }
    }
}

/// A row from the `clubs` table.
#[derive(Debug, Clone, FromRow)]
pub struct ClubRow {
    pub id: DbId,
    pub name: String,
}
