//! PostgreSQL-backed stores, delegating to the `trainhub-db` repositories.

use async_trait::async_trait;
use trainhub_core::notification::{NewNotification, Notification};
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::session::{Club, Member, Session};
use trainhub_core::settings::NotificationSettings;
use trainhub_core::types::{DbId, Timestamp};
use trainhub_db::repositories::{
    ClubRepo, NotificationRepo, NotificationSettingsRepo, PushTokenRepo, SessionRepo,
};
use trainhub_db::DbPool;

use super::{ClubDirectory, NotificationStore, PushTokenStore, SessionSource, SettingsStore};
use crate::error::NotifyResult;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create(&self, input: &NewNotification, now: Timestamp) -> NotifyResult<Notification> {
        Ok(NotificationRepo::create(&self.pool, input, now).await?)
    }

    async fn reminder_exists_since(
        &self,
        session_id: DbId,
        since: Timestamp,
    ) -> NotifyResult<bool> {
        Ok(NotificationRepo::reminder_exists_since(&self.pool, session_id, since).await?)
    }

    async fn mark_sent(&self, notification_id: DbId, sent_at: Timestamp) -> NotifyResult<()> {
        Ok(NotificationRepo::mark_sent(&self.pool, notification_id, sent_at).await?)
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> NotifyResult<Vec<Notification>> {
        Ok(
            NotificationRepo::list_for_user(&self.pool, user_id, unread_only, limit, offset)
                .await?,
        )
    }

    async fn unread_count(&self, user_id: DbId) -> NotifyResult<i64> {
        Ok(NotificationRepo::unread_count(&self.pool, user_id).await?)
    }

    async fn mark_read(&self, notification_id: DbId, user_id: DbId) -> NotifyResult<bool> {
        Ok(NotificationRepo::mark_read(&self.pool, notification_id, user_id).await?)
    }

    async fn mark_all_read(&self, user_id: DbId) -> NotifyResult<u64> {
        Ok(NotificationRepo::mark_all_read(&self.pool, user_id).await?)
    }

    async fn delete_read_before(&self, cutoff: Timestamp) -> NotifyResult<u64> {
        Ok(NotificationRepo::delete_read_before(&self.pool, cutoff).await?)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn find(&self, user_id: DbId) -> NotifyResult<Option<NotificationSettings>> {
        Ok(NotificationSettingsRepo::find(&self.pool, user_id).await?)
    }

    async fn get_or_create(&self, user_id: DbId) -> NotifyResult<NotificationSettings> {
        Ok(NotificationSettingsRepo::get_or_create(&self.pool, user_id).await?)
    }

    async fn save(&self, settings: &NotificationSettings) -> NotifyResult<NotificationSettings> {
        Ok(NotificationSettingsRepo::save(&self.pool, settings).await?)
    }
}

#[async_trait]
impl PushTokenStore for PgStore {
    async fn register(
        &self,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<PushToken> {
        Ok(PushTokenRepo::register(&self.pool, user_id, platform, token, now).await?)
    }

    async fn deactivate(&self, user_id: DbId, token: &str, now: Timestamp) -> NotifyResult<bool> {
        Ok(PushTokenRepo::deactivate(&self.pool, user_id, token, now).await?)
    }

    async fn list_active(
        &self,
        user_id: DbId,
        platform: Option<Platform>,
    ) -> NotifyResult<Vec<PushToken>> {
        Ok(PushTokenRepo::list_active(&self.pool, user_id, platform).await?)
    }

    async fn delete_inactive_before(&self, cutoff: Timestamp) -> NotifyResult<u64> {
        Ok(PushTokenRepo::delete_inactive_before(&self.pool, cutoff).await?)
    }
}

#[async_trait]
impl SessionSource for PgStore {
    async fn list_planned_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> NotifyResult<Vec<Session>> {
        Ok(SessionRepo::list_planned_between(&self.pool, from, to).await?)
    }
}

#[async_trait]
impl ClubDirectory for PgStore {
    async fn find_club(&self, club_id: DbId) -> NotifyResult<Option<Club>> {
        Ok(ClubRepo::find_with_members(&self.pool, club_id).await?)
    }

    async fn find_user(&self, user_id: DbId) -> NotifyResult<Option<Member>> {
        Ok(ClubRepo::find_user(&self.pool, user_id).await?)
    }
}
