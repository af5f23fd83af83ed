//! Storage seams of the pipeline.
//!
//! Every collaborator the pipeline reads or writes sits behind one of these
//! traits. [`Stores`] bundles one implementation of each: PostgreSQL in
//! production, [`memory::MemoryStore`] in tests.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use trainhub_core::notification::{NewNotification, Notification};
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::session::{Club, Member, Session};
use trainhub_core::settings::NotificationSettings;
use trainhub_core::types::{DbId, Timestamp};
use trainhub_db::DbPool;

use crate::error::NotifyResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, input: &NewNotification, now: Timestamp) -> NotifyResult<Notification>;

    /// Whether a reminder for `session_id` exists with `created_at >= since`.
    async fn reminder_exists_since(&self, session_id: DbId, since: Timestamp)
        -> NotifyResult<bool>;

    async fn mark_sent(&self, notification_id: DbId, sent_at: Timestamp) -> NotifyResult<()>;

    async fn list_for_user(
        &self,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> NotifyResult<Vec<Notification>>;

    async fn unread_count(&self, user_id: DbId) -> NotifyResult<i64>;

    async fn mark_read(&self, notification_id: DbId, user_id: DbId) -> NotifyResult<bool>;

    async fn mark_all_read(&self, user_id: DbId) -> NotifyResult<u64>;

    async fn delete_read_before(&self, cutoff: Timestamp) -> NotifyResult<u64>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn find(&self, user_id: DbId) -> NotifyResult<Option<NotificationSettings>>;

    /// Return the stored settings, persisting defaults first if absent.
    async fn get_or_create(&self, user_id: DbId) -> NotifyResult<NotificationSettings>;

    async fn save(&self, settings: &NotificationSettings) -> NotifyResult<NotificationSettings>;
}

#[async_trait]
pub trait PushTokenStore: Send + Sync {
    /// Make `token` the only active token of the user on `platform`.
    async fn register(
        &self,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<PushToken>;

    async fn deactivate(&self, user_id: DbId, token: &str, now: Timestamp) -> NotifyResult<bool>;

    async fn list_active(
        &self,
        user_id: DbId,
        platform: Option<Platform>,
    ) -> NotifyResult<Vec<PushToken>>;

    async fn delete_inactive_before(&self, cutoff: Timestamp) -> NotifyResult<u64>;
}

#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Planned sessions with `from <= scheduled_at <= to`.
    async fn list_planned_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> NotifyResult<Vec<Session>>;
}

#[async_trait]
pub trait ClubDirectory: Send + Sync {
    async fn find_club(&self, club_id: DbId) -> NotifyResult<Option<Club>>;

    async fn find_user(&self, user_id: DbId) -> NotifyResult<Option<Member>>;
}

/// One implementation of every storage seam.
#[derive(Clone)]
pub struct Stores {
    pub notifications: Arc<dyn NotificationStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub push_tokens: Arc<dyn PushTokenStore>,
    pub sessions: Arc<dyn SessionSource>,
    pub clubs: Arc<dyn ClubDirectory>,
}

impl Stores {
    pub fn postgres(pool: DbPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            notifications: store.clone(),
            settings: store.clone(),
            push_tokens: store.clone(),
            sessions: store.clone(),
            clubs: store,
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            notifications: store.clone(),
            settings: store.clone(),
            push_tokens: store.clone(),
            sessions: store.clone(),
            clubs: store,
        }
    }
}
