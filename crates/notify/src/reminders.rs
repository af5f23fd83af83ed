//! Reminder candidates and the per-session dedup guard.

use std::sync::Arc;

use trainhub_core::reminder::{dedup_cutoff, lead_window_end};
use trainhub_core::session::ReminderCandidate;
use trainhub_core::types::{DbId, Timestamp};

use crate::error::NotifyResult;
use crate::store::{ClubDirectory, NotificationStore, SessionSource};

// ---------------------------------------------------------------------------
// CandidateFinder
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CandidateFinder {
    sessions: Arc<dyn SessionSource>,
    clubs: Arc<dyn ClubDirectory>,
}

impl CandidateFinder {
    pub fn new(sessions: Arc<dyn SessionSource>, clubs: Arc<dyn ClubDirectory>) -> Self {
        Self { sessions, clubs }
    }

    /// Planned sessions starting within the next 24 hours, both ends
    /// inclusive, each with its club roster when it belongs to a club.
    ///
    /// A session whose club no longer exists, or whose club lookup fails, is
    /// skipped. Only a failure to list sessions fails the whole call.
    pub async fn find_candidates(&self, now: Timestamp) -> NotifyResult<Vec<ReminderCandidate>> {
        let sessions = self
            .sessions
            .list_planned_between(now, lead_window_end(now))
            .await?;

        let mut candidates = Vec::with_capacity(sessions.len());
        for session in sessions {
            let roster = match session.club_id {
                None => None,
                Some(club_id) => match self.clubs.find_club(club_id).await {
                    Ok(Some(club)) => Some(club.members),
                    Ok(None) => {
                        tracing::warn!(
                            session_id = session.id,
                            club_id,
                            "Club not found for session, skipping"
                        );
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(
                            session_id = session.id,
                            club_id,
                            error = %e,
                            "Club lookup failed, skipping session"
                        );
                        continue;
                    }
                },
            };
            candidates.push(ReminderCandidate { session, roster });
        }

        tracing::debug!(count = candidates.len(), "Reminder candidates found");
        Ok(candidates)
    }
}

// ---------------------------------------------------------------------------
// DedupGuard
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct DedupGuard {
    notifications: Arc<dyn NotificationStore>,
}

impl DedupGuard {
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Whether any reminder for the session, to any recipient, was created
    /// within the last 2 hours.
    pub async fn recently_reminded(&self, session_id: DbId, now: Timestamp) -> NotifyResult<bool> {
        self.notifications
            .reminder_exists_since(session_id, dedup_cutoff(now))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};
    use trainhub_core::notification::NewNotification;
    use trainhub_core::session::{Session, SessionStatus};

    fn session(id: DbId, scheduled_at: Timestamp, club_id: Option<DbId>) -> Session {
        Session {
            id,
            name: format!("Session {id}"),
            scheduled_at,
            status: SessionStatus::Planned,
            user_id: 1,
            club_id,
        }
    }

    #[tokio::test]
    async fn window_is_inclusive_and_planned_only() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        let store = Arc::new(MemoryStore::new());
        store.add_session(session(1, now + Duration::hours(24), None));
        store.add_session(session(2, now + Duration::hours(24) + Duration::seconds(1), None));
        store.add_session(session(3, now - Duration::minutes(1), None));
        let mut cancelled = session(4, now + Duration::hours(2), None);
        cancelled.status = SessionStatus::Cancelled;
        store.add_session(cancelled);

        let finder = CandidateFinder::new(store.clone(), store);
        let found = finder.find_candidates(now).await.unwrap();
        let ids: Vec<DbId> = found.iter().map(|c| c.session.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(found[0].roster.is_none());
    }

    #[tokio::test]
    async fn club_sessions_carry_the_roster() {
        let now = Utc::now();
        let store = Arc::new(MemoryStore::new());
        store.add_user(1, "Coach");
        store.add_user(2, "Ana");
        store.add_club(10, "Harriers", &[1, 2]);
        store.add_session(session(1, now + Duration::hours(3), Some(10)));
        store.add_session(session(2, now + Duration::hours(4), Some(99)));

        let finder = CandidateFinder::new(store.clone(), store);
        let found = finder.find_candidates(now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].audience(), vec![1, 2]);
    }

    #[tokio::test]
    async fn dedup_covers_any_recipient_within_cooldown() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        let store = Arc::new(MemoryStore::new());
        let s = session(5, now + Duration::hours(20), None);
        store.insert_notification(
            &NewNotification::session_reminder(42, &s, 21),
            now - Duration::minutes(90),
        );

        let guard = DedupGuard::new(store);
        assert!(guard.recently_reminded(5, now).await.unwrap());
        assert!(!guard.recently_reminded(6, now).await.unwrap());
        assert!(!guard
            .recently_reminded(5, now + Duration::minutes(31))
            .await
            .unwrap());
    }
}
