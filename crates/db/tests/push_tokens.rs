//! Integration tests for the push-token registry.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use trainhub_core::push::Platform;
use trainhub_db::repositories::PushTokenRepo;

#[sqlx::test(migrations = "./migrations")]
async fn second_registration_deactivates_the_first(pool: PgPool) {
    let user = common::seed_user(&pool, "Léa").await;
    let now = Utc::now();

    let first = PushTokenRepo::register(&pool, user, Platform::Android, "tok-a", now)
        .await
        .unwrap();
    assert!(first.is_active);

    let second = PushTokenRepo::register(&pool, user, Platform::Android, "tok-b", now)
        .await
        .unwrap();
    assert!(second.is_active);

    let active = PushTokenRepo::list_active(&pool, user, Some(Platform::Android))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token, "tok-b");
}

#[sqlx::test(migrations = "./migrations")]
async fn users_beyond_32_bit_ids_register_independently(pool: PgPool) {
    let low = common::seed_user_with_id(&pool, 7, "Low").await;
    let high = common::seed_user_with_id(&pool, (1_i64 << 32) + 7, "High").await;
    let now = Utc::now();

    PushTokenRepo::register(&pool, low, Platform::Ios, "low-phone", now)
        .await
        .unwrap();
    PushTokenRepo::register(&pool, high, Platform::Ios, "high-phone", now)
        .await
        .unwrap();

    let low_active = PushTokenRepo::list_active(&pool, low, None).await.unwrap();
    let high_active = PushTokenRepo::list_active(&pool, high, None).await.unwrap();
    assert_eq!(low_active.len(), 1);
    assert_eq!(high_active.len(), 1);
    assert_eq!(high_active[0].user_id, high);
}

#[sqlx::test(migrations = "./migrations")]
async fn platforms_are_independent(pool: PgPool) {
    let user = common::seed_user(&pool, "Léa").await;
    let now = Utc::now();

    PushTokenRepo::register(&pool, user, Platform::Android, "phone", now)
        .await
        .unwrap();
    PushTokenRepo::register(&pool, user, Platform::Web, "browser", now)
        .await
        .unwrap();

    let active = PushTokenRepo::list_active(&pool, user, None).await.unwrap();
    assert_eq!(active.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn re_registering_a_token_reactivates_it(pool: PgPool) {
    let user = common::seed_user(&pool, "Léa").await;
    let now = Utc::now();

    PushTokenRepo::register(&pool, user, Platform::Ios, "tok-a", now)
        .await
        .unwrap();
    PushTokenRepo::register(&pool, user, Platform::Ios, "tok-b", now)
        .await
        .unwrap();
    let again = PushTokenRepo::register(&pool, user, Platform::Ios, "tok-a", now)
        .await
        .unwrap();
    assert!(again.is_active);

    let active = PushTokenRepo::list_active(&pool, user, Some(Platform::Ios))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token, "tok-a");
}

#[sqlx::test(migrations = "./migrations")]
async fn cleanup_removes_only_stale_inactive_tokens(pool: PgPool) {
    let user = common::seed_user(&pool, "Léa").await;
    let now = Utc::now();
    let long_ago = now - Duration::days(30);

    // Old active token: must survive.
    PushTokenRepo::register(&pool, user, Platform::Web, "old-active", long_ago)
        .await
        .unwrap();
    // Old inactive token: must go.
    PushTokenRepo::register(&pool, user, Platform::Android, "old-inactive", long_ago)
        .await
        .unwrap();
    PushTokenRepo::deactivate(&pool, user, "old-inactive", long_ago)
        .await
        .unwrap();
    // Recently deactivated token: must survive.
    PushTokenRepo::register(&pool, user, Platform::Ios, "fresh-inactive", now)
        .await
        .unwrap();
    PushTokenRepo::deactivate(&pool, user, "fresh-inactive", now - Duration::days(2))
        .await
        .unwrap();

    let deleted = PushTokenRepo::delete_inactive_before(&pool, now - Duration::days(7))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining: Vec<String> = sqlx::query_scalar("SELECT token FROM push_tokens ORDER BY token")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, vec!["fresh-inactive", "old-active"]);
}
