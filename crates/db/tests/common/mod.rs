//! Seed helpers shared by the repository tests.

use sqlx::PgPool;
use trainhub_core::types::{DbId, Timestamp};

pub async fn seed_user(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert user")
}

/// Insert a user with an explicit id, e.g. one beyond the 32-bit range.
pub async fn seed_user_with_id(pool: &PgPool, id: DbId, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (id, name) VALUES ($1, $2) RETURNING id")
        .bind(id)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert user")
}

pub async fn seed_club(pool: &PgPool, name: &str, owner_id: DbId, members: &[DbId]) -> DbId {
    let club_id: DbId =
        sqlx::query_scalar("INSERT INTO clubs (name, owner_id) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(owner_id)
            .fetch_one(pool)
            .await
            .expect("insert club");
    for (i, user_id) in members.iter().enumerate() {
        sqlx::query(
            "INSERT INTO club_members (club_id, user_id, joined_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3))",
        )
        .bind(club_id)
        .bind(user_id)
        .bind(i as f64)
        .execute(pool)
        .await
        .expect("insert member");
    }
    club_id
}

pub async fn seed_session(
    pool: &PgPool,
    name: &str,
    scheduled_at: Timestamp,
    status: &str,
    user_id: DbId,
    club_id: Option<DbId>,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO training_sessions (name, scheduled_at, status, user_id, club_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(name)
    .bind(scheduled_at)
    .bind(status)
    .bind(user_id)
    .bind(club_id)
    .fetch_one(pool)
    .await
    .expect("insert session")
}
