//! Read access to clubs, rosters and user names.

use sqlx::PgPool;
use trainhub_core::session::{Club, Member};
use trainhub_core::types::DbId;

use crate::models::session::{ClubRow, MemberRow};

pub struct ClubRepo;

impl ClubRepo {
    /// Load a club with its full roster, or `None` if it does not exist.
    pub async fn find_with_members(
        pool: &PgPool,
        club_id: DbId,
    ) -> Result<Option<Club>, sqlx::Error> {
        let club = sqlx::query_as::<_, ClubRow>("SELECT id, name FROM clubs WHERE id = $1")
            .bind(club_id)
            .fetch_optional(pool)
            .await?;

        let Some(club) = club else {
            return Ok(None);
        };

        let members = Self::list_members(pool, club_id).await?;
        Ok(Some(Club {
            id: club.id,
            name: club.name,
            members,
        }))
    }

    /// Members of a club in join order.
    pub async fn list_members(pool: &PgPool, club_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT u.id AS user_id, u.name FROM club_members cm \
             JOIN users u ON u.id = cm.user_id \
             WHERE cm.club_id = $1 \
             ORDER BY cm.joined_at, u.id",
        )
        .bind(club_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Identity of a single user.
    pub async fn find_user(pool: &PgPool, user_id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id AS user_id, name FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }
}
