//! Repository for the `push_tokens` table.

use sqlx::PgPool;
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::types::{DbId, Timestamp};

use crate::models::push_token::PushTokenRow;

const COLUMNS: &str = "id, user_id, platform, token, is_active, created_at, updated_at";

/// Advisory-lock namespace for token registration, so registrations of the
/// same user serialize without locking unrelated rows. Hashed together with
/// the full 64-bit user id into one `bigint` key.
const REGISTER_LOCK_NAMESPACE: &str = "push_token_register";

pub struct PushTokenRepo;

impl PushTokenRepo {
    /// Register `token` as the single active token of `user_id` on `platform`.
    ///
    /// Runs in one transaction: take a per-user advisory lock, deactivate any
    /// other active token for the platform, then upsert this one as active.
    /// Concurrent registrations for the same user queue on the lock, so the
    /// last one to commit wins.
    pub async fn register(
        pool: &PgPool,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> Result<PushToken, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, $2))")
            .bind(REGISTER_LOCK_NAMESPACE)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE push_tokens SET is_active = false, updated_at = $4 \
             WHERE user_id = $1 AND platform = $2 AND token <> $3 AND is_active",
        )
        .bind(user_id)
        .bind(platform.as_str())
        .bind(token)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO push_tokens (user_id, platform, token, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, true, $4, $4) \
             ON CONFLICT (user_id, platform, token) DO UPDATE SET \
                is_active = true, \
                updated_at = EXCLUDED.updated_at \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PushTokenRow>(&query)
            .bind(user_id)
            .bind(platform.as_str())
            .bind(token)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_domain()
    }

    /// Deactivate one of the user's tokens. Returns `true` if a row changed.
    pub async fn deactivate(
        pool: &PgPool,
        user_id: DbId,
        token: &str,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE push_tokens SET is_active = false, updated_at = $3 \
             WHERE user_id = $1 AND token = $2 AND is_active",
        )
        .bind(user_id)
        .bind(token)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active tokens of a user, optionally restricted to one platform.
    pub async fn list_active(
        pool: &PgPool,
        user_id: DbId,
        platform: Option<Platform>,
    ) -> Result<Vec<PushToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_tokens \
             WHERE user_id = $1 AND is_active \
               AND ($2::text IS NULL OR platform = $2) \
             ORDER BY platform, id"
        );
        sqlx::query_as::<_, PushTokenRow>(&query)
            .bind(user_id)
            .bind(platform.map(|p| p.as_str()))
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(PushTokenRow::into_domain)
            .collect()
    }

    /// Hard-delete inactive tokens last touched before `cutoff`. Active tokens
    /// are never removed.
    pub async fn delete_inactive_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM push_tokens WHERE is_active = false AND updated_at < $1")
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
