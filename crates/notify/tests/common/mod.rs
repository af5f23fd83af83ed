//! Shared harness for pipeline tests: an in-memory store, a pinned clock and
//! scriptable push providers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use trainhub_core::clock::FixedClock;
use trainhub_core::push::PushMessage;
use trainhub_core::session::{Session, SessionStatus};
use trainhub_core::types::{DbId, Timestamp};
use trainhub_notify::push::{PushError, PushProvider, PushResponse, TokenResult};
use trainhub_notify::store::MemoryStore;
use trainhub_notify::{NotificationService, Scheduler, SchedulerConfig, Stores};

/// Monday 2024-03-04 22:30 UTC.
pub fn monday_evening() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 4, 22, 30, 0).unwrap()
}

pub fn planned_session(
    id: DbId,
    name: &str,
    scheduled_at: Timestamp,
    owner: DbId,
    club_id: Option<DbId>,
) -> Session {
    Session {
        id,
        name: name.to_string(),
        scheduled_at,
        status: SessionStatus::Planned,
        user_id: owner,
        club_id,
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Accepts every token and remembers each batch.
#[derive(Default)]
pub struct RecordingProvider {
    pub batches: Mutex<Vec<(Vec<String>, PushMessage)>>,
}

impl RecordingProvider {
    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl PushProvider for RecordingProvider {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushResponse, PushError> {
        self.batches
            .lock()
            .unwrap()
            .push((tokens.to_vec(), message.clone()));
        let results = tokens
            .iter()
            .map(|t| TokenResult {
                token: t.clone(),
                success: !t.starts_with("dead"),
                error: None,
            })
            .collect();
        Ok(PushResponse::from_results(results))
    }
}

pub struct FailingProvider;

#[async_trait]
impl PushProvider for FailingProvider {
    async fn send(&self, _: &[String], _: &PushMessage) -> Result<PushResponse, PushError> {
        Err(PushError::Rejected("gateway unavailable".into()))
    }
}

/// Never answers within any sane timeout.
pub struct StalledProvider;

#[async_trait]
impl PushProvider for StalledProvider {
    async fn send(&self, _: &[String], _: &PushMessage) -> Result<PushResponse, PushError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(PushResponse::default())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub service: NotificationService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(RecordingProvider::default()))
    }

    pub fn with_provider(provider: Arc<dyn PushProvider>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = NotificationService::new(
            Stores::in_memory(store.clone()),
            provider,
            Duration::from_secs(10),
        );
        Self {
            store,
            clock: Arc::new(FixedClock::new(monday_evening())),
            service,
        }
    }

    pub fn now(&self) -> Timestamp {
        use trainhub_core::clock::Clock;
        self.clock.now()
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            self.service.clone(),
            self.clock.clone(),
            SchedulerConfig::default(),
        )
    }

    /// A club of `members` (id, name) pairs in join order.
    pub fn club(&self, club_id: DbId, name: &str, members: &[(DbId, &str)]) {
        for (id, member_name) in members {
            self.store.add_user(*id, member_name);
        }
        let ids: Vec<DbId> = members.iter().map(|(id, _)| *id).collect();
        self.store.add_club(club_id, name, &ids);
    }
}
