//! Turns pipeline events into stored notifications, one per recipient.
//!
//! Every recipient is handled on its own: a failed insert is recorded in the
//! [`GenerationReport`] and the batch carries on.

use std::sync::Arc;

use trainhub_core::notification::{NewNotification, Notification, NotificationKind};
use trainhub_core::session::{Club, Member, ReminderCandidate};
use trainhub_core::types::{DbId, Timestamp};

use crate::error::{NotifyError, NotifyResult};
use crate::settings::SettingsResolver;
use crate::store::{ClubDirectory, NotificationStore};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A recipient whose notification could not be stored.
#[derive(Debug)]
pub struct RecipientFailure {
    pub user_id: DbId,
    pub error: NotifyError,
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Persisted notifications, with their ids.
    pub created: Vec<Notification>,
    /// Recipients filtered out by their settings.
    pub skipped: Vec<DbId>,
    pub failed: Vec<RecipientFailure>,
}

impl GenerationReport {
    fn record(&mut self, user_id: DbId, result: NotifyResult<Notification>) {
        match result {
            Ok(notification) => self.created.push(notification),
            Err(error) => {
                tracing::error!(user_id, error = %error, "Failed to store notification");
                self.failed.push(RecipientFailure { user_id, error });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct NotificationGenerator {
    notifications: Arc<dyn NotificationStore>,
    clubs: Arc<dyn ClubDirectory>,
    settings: SettingsResolver,
}

impl NotificationGenerator {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        clubs: Arc<dyn ClubDirectory>,
        settings: SettingsResolver,
    ) -> Self {
        Self {
            notifications,
            clubs,
            settings,
        }
    }

    /// One reminder per audience member who has session reminders on and a
    /// reminder horizon of at least `hours_before`.
    pub async fn generate_session_reminders(
        &self,
        candidate: &ReminderCandidate,
        hours_before: i64,
        now: Timestamp,
    ) -> GenerationReport {
        let session = &candidate.session;
        let mut report = GenerationReport::default();

        for user_id in candidate.audience() {
            let settings = self.settings.resolve(user_id).await;
            if !settings.wants_session_reminder(hours_before) {
                tracing::debug!(
                    user_id,
                    session_id = session.id,
                    hours_before,
                    "Session reminder disabled by user settings"
                );
                report.skipped.push(user_id);
                continue;
            }

            let input = NewNotification::session_reminder(user_id, session, hours_before);
            let result = self.notifications.create(&input, now).await;
            report.record(user_id, result);
        }

        tracing::info!(
            session_id = session.id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Session reminders generated"
        );
        report
    }

    /// Tell every other club member that `added_by` added an exercise.
    pub async fn generate_exercise_added(
        &self,
        club_id: DbId,
        exercise_name: &str,
        added_by: DbId,
        now: Timestamp,
    ) -> NotifyResult<GenerationReport> {
        let Some(club) = self.load_club(club_id).await? else {
            return Ok(GenerationReport::default());
        };
        let Some(adder) = self.load_member(&club, added_by).await? else {
            return Ok(GenerationReport::default());
        };

        let report = self
            .fan_out(
                &club,
                added_by,
                NotificationKind::ExerciseAddedToClub,
                now,
                |user_id| {
                    NewNotification::exercise_added(
                        user_id,
                        club.id,
                        &club.name,
                        exercise_name,
                        &adder.name,
                    )
                },
            )
            .await;

        tracing::info!(
            club_id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            "Exercise-added notifications generated"
        );
        Ok(report)
    }

    /// Tell the club's existing members that `new_member` joined.
    pub async fn generate_member_joined(
        &self,
        club_id: DbId,
        new_member: DbId,
        now: Timestamp,
    ) -> NotifyResult<GenerationReport> {
        let Some(club) = self.load_club(club_id).await? else {
            return Ok(GenerationReport::default());
        };
        let Some(joiner) = self.load_member(&club, new_member).await? else {
            return Ok(GenerationReport::default());
        };

        let report = self
            .fan_out(
                &club,
                new_member,
                NotificationKind::MemberJoinedClub,
                now,
                |user_id| {
                    NewNotification::member_joined(
                        user_id,
                        club.id,
                        &club.name,
                        joiner.user_id,
                        &joiner.name,
                    )
                },
            )
            .await;

        tracing::info!(
            club_id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            "Member-joined notifications generated"
        );
        Ok(report)
    }

    /// Notify every club member except `excluded`, gated by `kind`.
    async fn fan_out<F>(
        &self,
        club: &Club,
        excluded: DbId,
        kind: NotificationKind,
        now: Timestamp,
        build: F,
    ) -> GenerationReport
    where
        F: Fn(DbId) -> NewNotification,
    {
        let mut report = GenerationReport::default();

        for member in club.members.iter().filter(|m| m.user_id != excluded) {
            let settings = self.settings.resolve(member.user_id).await;
            if !settings.allows(kind) {
                tracing::debug!(
                    user_id = member.user_id,
                    kind = %kind,
                    "Disabled by user settings"
                );
                report.skipped.push(member.user_id);
                continue;
            }

            let result = self.notifications.create(&build(member.user_id), now).await;
            report.record(member.user_id, result);
        }
        report
    }

    async fn load_club(&self, club_id: DbId) -> NotifyResult<Option<Club>> {
        let club = self.clubs.find_club(club_id).await?;
        if club.is_none() {
            tracing::warn!(club_id, "Club not found, skipping notifications");
        }
        Ok(club)
    }

    /// Resolve a user's identity, from the roster first and the directory
    /// second.
    async fn load_member(&self, club: &Club, user_id: DbId) -> NotifyResult<Option<Member>> {
        if let Some(member) = club.members.iter().find(|m| m.user_id == user_id) {
            return Ok(Some(member.clone()));
        }
        let member = self.clubs.find_user(user_id).await?;
        if member.is_none() {
            tracing::warn!(club_id = club.id, user_id, "User not found, skipping notifications");
        }
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};
    use trainhub_core::session::{Session, SessionStatus};
    use trainhub_core::settings::NotificationSettings;

    fn setup() -> (Arc<MemoryStore>, NotificationGenerator) {
        let store = Arc::new(MemoryStore::new());
        let generator = NotificationGenerator::new(
            store.clone(),
            store.clone(),
            SettingsResolver::new(store.clone()),
        );
        (store, generator)
    }

    fn candidate(roster: Option<Vec<Member>>) -> ReminderCandidate {
        ReminderCandidate {
            session: Session {
                id: 8,
                name: "Hill repeats".into(),
                scheduled_at: Utc::now() + Duration::hours(5),
                status: SessionStatus::Planned,
                user_id: 1,
                club_id: roster.as_ref().map(|_| 3),
            },
            roster,
        }
    }

    #[tokio::test]
    async fn reminder_horizon_filters_recipients() {
        let (store, generator) = setup();
        let mut short = NotificationSettings::defaults_for(2);
        short.reminder_hours = 2;
        store.put_settings(short);

        let roster = vec![
            Member { user_id: 1, name: "Coach".into() },
            Member { user_id: 2, name: "Ana".into() },
        ];
        let report = generator
            .generate_session_reminders(&candidate(Some(roster)), 5, Utc::now())
            .await;

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].user_id, 1);
        assert_eq!(report.skipped, vec![2]);
    }

    #[tokio::test]
    async fn creator_is_the_audience_without_club() {
        let (_, generator) = setup();
        let report = generator
            .generate_session_reminders(&candidate(None), 5, Utc::now())
            .await;
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].user_id, 1);
        assert!(report.created[0].id > 0);
    }

    #[tokio::test]
    async fn unknown_club_yields_empty_report() {
        let (store, generator) = setup();
        let report = generator
            .generate_exercise_added(404, "Plank", 1, Utc::now())
            .await
            .unwrap();
        assert!(report.created.is_empty());
        assert!(store.notifications().is_empty());
    }

    #[tokio::test]
    async fn exercise_added_excludes_the_adder() {
        let (store, generator) = setup();
        store.add_user(1, "Coach");
        store.add_user(2, "Ana");
        store.add_user(3, "Ben");
        store.add_club(3, "Harriers", &[1, 2, 3]);

        let report = generator
            .generate_exercise_added(3, "Plank", 2, Utc::now())
            .await
            .unwrap();
        let recipients: Vec<DbId> = report.created.iter().map(|n| n.user_id).collect();
        assert_eq!(recipients, vec![1, 3]);
        assert!(report.created[0].message.contains("Ana"));
        assert!(report.created[0].message.contains("Plank"));
    }
}
