//! Integration tests for the read-only session and club queries.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use trainhub_db::repositories::{ClubRepo, SessionRepo};

#[sqlx::test(migrations = "./migrations")]
async fn only_planned_sessions_inside_the_window(pool: PgPool) {
    let coach = common::seed_user(&pool, "Coach").await;
    let now = Utc::now();
    let end = now + Duration::hours(24);

    let seed = |name: &'static str, at, status: &'static str| {
        let pool = pool.clone();
        async move { common::seed_session(&pool, name, at, status, coach, None).await }
    };

    let inside = seed("inside", now + Duration::hours(20), "planned").await;
    let boundary = seed("boundary", end, "planned").await;
    seed("too-late", end + Duration::seconds(1), "planned").await;
    seed("past", now - Duration::minutes(5), "planned").await;
    seed("cancelled", now + Duration::hours(2), "cancelled").await;
    seed("running", now + Duration::hours(2), "in_progress").await;

    let ids: Vec<i64> = SessionRepo::list_planned_between(&pool, now, end)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![inside, boundary]);
}

#[sqlx::test(migrations = "./migrations")]
async fn club_roster_in_join_order(pool: PgPool) {
    let coach = common::seed_user(&pool, "Coach").await;
    let ana = common::seed_user(&pool, "Ana").await;
    let ben = common::seed_user(&pool, "Ben").await;
    let club = common::seed_club(&pool, "Running Club", coach, &[coach, ana, ben]).await;

    let found = ClubRepo::find_with_members(&pool, club).await.unwrap().unwrap();
    assert_eq!(found.name, "Running Club");
    let ids: Vec<i64> = found.members.iter().map(|m| m.user_id).collect();
    assert_eq!(ids, vec![coach, ana, ben]);

    assert!(ClubRepo::find_with_members(&pool, club + 1000).await.unwrap().is_none());
    assert_eq!(ClubRepo::find_user(&pool, ana).await.unwrap().unwrap().name, "Ana");
}
