//! Entry points of the pipeline: the scheduled jobs, club events and the
//! notification inbox.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trainhub_core::notification::Notification;
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::reminder::{hours_until, notification_retention_cutoff, stale_token_cutoff};
use trainhub_core::settings::{NotificationSettings, UpdateNotificationSettings};
use trainhub_core::types::{DbId, Timestamp};

use crate::dispatcher::{DispatchOutcome, PushDispatcher};
use crate::error::NotifyResult;
use crate::generator::{GenerationReport, NotificationGenerator};
use crate::push::PushProvider;
use crate::reminders::{CandidateFinder, DedupGuard};
use crate::settings::SettingsResolver;
use crate::store::{NotificationStore, Stores};
use crate::tokens::PushTokenRegistry;

// ---------------------------------------------------------------------------
// Events and reports
// ---------------------------------------------------------------------------

/// Club activity that fans out to the other members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClubEvent {
    ExerciseAdded {
        club_id: DbId,
        exercise_name: String,
        added_by: DbId,
    },
    MemberJoined {
        club_id: DbId,
        user_id: DbId,
    },
}

/// Push outcomes for a group of notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchTally {
    pub sent: usize,
    pub no_tokens: usize,
    pub failed: usize,
}

impl DispatchTally {
    fn add(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent { .. } => self.sent += 1,
            DispatchOutcome::NoTokens => self.no_tokens += 1,
            DispatchOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Summary of one reminder cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRunReport {
    pub sessions_found: usize,
    /// Sessions skipped because a reminder went out within the cooldown.
    pub sessions_deduplicated: usize,
    pub notifications_created: usize,
    pub recipients_skipped: usize,
    pub recipients_failed: usize,
    pub push: DispatchTally,
}

// ---------------------------------------------------------------------------
// NotificationService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    finder: CandidateFinder,
    dedup: DedupGuard,
    settings: SettingsResolver,
    generator: NotificationGenerator,
    dispatcher: PushDispatcher,
    tokens: PushTokenRegistry,
}

impl NotificationService {
    pub fn new(stores: Stores, provider: Arc<dyn PushProvider>, push_timeout: Duration) -> Self {
        let settings = SettingsResolver::new(stores.settings.clone());
        Self {
            finder: CandidateFinder::new(stores.sessions.clone(), stores.clubs.clone()),
            dedup: DedupGuard::new(stores.notifications.clone()),
            generator: NotificationGenerator::new(
                stores.notifications.clone(),
                stores.clubs.clone(),
                settings.clone(),
            ),
            dispatcher: PushDispatcher::new(
                stores.push_tokens.clone(),
                stores.notifications.clone(),
                provider,
                push_timeout,
            ),
            tokens: PushTokenRegistry::new(stores.push_tokens),
            notifications: stores.notifications,
            settings,
        }
    }

    pub fn settings(&self) -> &SettingsResolver {
        &self.settings
    }

    pub fn tokens(&self) -> &PushTokenRegistry {
        &self.tokens
    }

    pub fn dispatcher(&self) -> &PushDispatcher {
        &self.dispatcher
    }

    // -- Scheduled jobs -----------------------------------------------------

    /// Remind the audience of every planned session starting within 24 hours.
    ///
    /// Sessions reminded in the last 2 hours are skipped. A failure on one
    /// session or recipient is logged and counted; only a failure to list
    /// candidates fails the cycle.
    pub async fn run_reminder_cycle(&self, now: Timestamp) -> NotifyResult<ReminderRunReport> {
        let candidates = self.finder.find_candidates(now).await?;
        let mut report = ReminderRunReport {
            sessions_found: candidates.len(),
            ..Default::default()
        };

        for candidate in &candidates {
            let session_id = candidate.session.id;
            match self.dedup.recently_reminded(session_id, now).await {
                Ok(true) => {
                    tracing::debug!(session_id, "Session reminded recently, skipping");
                    report.sessions_deduplicated += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        session_id,
                        error = %e,
                        "Dedup check failed, skipping session"
                    );
                    continue;
                }
            }

            let hours_before = hours_until(candidate.session.scheduled_at, now);
            let generated = self
                .generator
                .generate_session_reminders(candidate, hours_before, now)
                .await;

            report.notifications_created += generated.created.len();
            report.recipients_skipped += generated.skipped.len();
            report.recipients_failed += generated.failed.len();

            let tally = self.dispatch_all(&generated.created, now).await;
            report.push.sent += tally.sent;
            report.push.no_tokens += tally.no_tokens;
            report.push.failed += tally.failed;
        }

        tracing::info!(
            sessions_found = report.sessions_found,
            sessions_deduplicated = report.sessions_deduplicated,
            notifications_created = report.notifications_created,
            pushes_sent = report.push.sent,
            "Reminder cycle complete"
        );
        Ok(report)
    }

    /// Delete read notifications older than 30 days.
    pub async fn cleanup_notifications(&self, now: Timestamp) -> NotifyResult<u64> {
        let deleted = self
            .notifications
            .delete_read_before(notification_retention_cutoff(now))
            .await?;
        tracing::info!(deleted, "Old read notifications removed");
        Ok(deleted)
    }

    /// Delete push tokens inactive for more than 7 days.
    pub async fn cleanup_push_tokens(&self, now: Timestamp) -> NotifyResult<u64> {
        let deleted = self
            .tokens
            .delete_inactive_before(stale_token_cutoff(now))
            .await?;
        tracing::info!(deleted, "Stale push tokens removed");
        Ok(deleted)
    }

    // -- Club events --------------------------------------------------------

    /// Generate and push the notifications for a club event.
    pub async fn handle_club_event(
        &self,
        event: &ClubEvent,
        now: Timestamp,
    ) -> NotifyResult<(GenerationReport, DispatchTally)> {
        let report = match event {
            ClubEvent::ExerciseAdded {
                club_id,
                exercise_name,
                added_by,
            } => {
                self.generator
                    .generate_exercise_added(*club_id, exercise_name, *added_by, now)
                    .await?
            }
            ClubEvent::MemberJoined { club_id, user_id } => {
                self.generator
                    .generate_member_joined(*club_id, *user_id, now)
                    .await?
            }
        };
        let tally = self.dispatch_all(&report.created, now).await;
        Ok((report, tally))
    }

    async fn dispatch_all(&self, notifications: &[Notification], now: Timestamp) -> DispatchTally {
        let mut tally = DispatchTally::default();
        for notification in notifications {
            match self.dispatcher.dispatch(notification, now).await {
                Ok(outcome) => tally.add(&outcome),
                Err(e) => {
                    tracing::error!(
                        notification_id = notification.id,
                        error = %e,
                        "Dispatch failed"
                    );
                    tally.failed += 1;
                }
            }
        }
        tally
    }

    // -- Inbox ----------------------------------------------------------------

    pub async fn list_for_user(
        &self,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> NotifyResult<Vec<Notification>> {
        self.notifications
            .list_for_user(user_id, unread_only, limit, offset)
            .await
    }

    pub async fn unread_count(&self, user_id: DbId) -> NotifyResult<i64> {
        self.notifications.unread_count(user_id).await
    }

    /// Mark one of the user's notifications read. Returns `false` if it does
    /// not exist, belongs to someone else, or was already read.
    pub async fn mark_read(&self, notification_id: DbId, user_id: DbId) -> NotifyResult<bool> {
        self.notifications.mark_read(notification_id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: DbId) -> NotifyResult<u64> {
        self.notifications.mark_all_read(user_id).await
    }

    // -- Settings and devices -----------------------------------------------

    pub async fn resolve_settings(&self, user_id: DbId) -> NotificationSettings {
        self.settings.resolve(user_id).await
    }

    pub async fn update_settings(
        &self,
        user_id: DbId,
        update: &UpdateNotificationSettings,
    ) -> NotifyResult<NotificationSettings> {
        self.settings.update(user_id, update).await
    }

    pub async fn register_push_token(
        &self,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<PushToken> {
        self.tokens.register(user_id, platform, token, now).await
    }

    pub async fn remove_push_token(
        &self,
        user_id: DbId,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<bool> {
        self.tokens.remove(user_id, token, now).await
    }
}
