//! In-memory stores for tests and local runs without a database.
//!
//! Every seam is served from one `Mutex`-guarded state. Seeding helpers fill
//! the read-only collaborators, and failure switches let tests make single
//! operations error.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use trainhub_core::notification::{NewNotification, Notification, NotificationKind};
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::session::{Club, Member, Session, SessionStatus};
use trainhub_core::settings::NotificationSettings;
use trainhub_core::types::{DbId, Timestamp};

use super::{ClubDirectory, NotificationStore, PushTokenStore, SessionSource, SettingsStore};
use crate::error::{NotifyError, NotifyResult};

#[derive(Default)]
struct State {
    next_id: DbId,
    notifications: Vec<Notification>,
    settings: HashMap<DbId, NotificationSettings>,
    push_tokens: Vec<PushToken>,
    sessions: Vec<Session>,
    clubs: Vec<Club>,
    users: HashMap<DbId, Member>,
    failing_recipients: HashSet<DbId>,
    fail_settings: bool,
    fail_sessions: bool,
    failing_clubs: HashSet<DbId>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_user(&self, user_id: DbId, name: &str) {
        self.lock().users.insert(
            user_id,
            Member {
                user_id,
                name: name.to_string(),
            },
        );
    }

    /// Add a club whose roster is `member_ids` in join order. Members must
    /// have been added with [`MemoryStore::add_user`].
    pub fn add_club(&self, club_id: DbId, name: &str, member_ids: &[DbId]) {
        let mut state = self.lock();
        let members = member_ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect();
        state.clubs.push(Club {
            id: club_id,
            name: name.to_string(),
            members,
        });
    }

    /// Append a user to an existing club roster.
    pub fn join_club(&self, club_id: DbId, user_id: DbId) {
        let mut state = self.lock();
        let Some(member) = state.users.get(&user_id).cloned() else {
            return;
        };
        if let Some(club) = state.clubs.iter_mut().find(|c| c.id == club_id) {
            club.members.push(member);
        }
    }

    pub fn add_session(&self, session: Session) {
        self.lock().sessions.push(session);
    }

    /// Store a notification as-is, bypassing the generator.
    pub fn insert_notification(
        &self,
        input: &NewNotification,
        created_at: Timestamp,
    ) -> Notification {
        let mut state = self.lock();
        let notification = Notification {
            id: state.next_id(),
            user_id: input.user_id,
            kind: input.kind,
            title: input.title.clone(),
            message: input.message.clone(),
            data: input.data.clone(),
            is_read: false,
            is_sent: false,
            sent_at: None,
            created_at,
        };
        state.notifications.push(notification.clone());
        notification
    }

    pub fn put_settings(&self, settings: NotificationSettings) {
        self.lock().settings.insert(settings.user_id, settings);
    }

    /// Make every notification insert for `user_id` fail.
    pub fn fail_notifications_for(&self, user_id: DbId) {
        self.lock().failing_recipients.insert(user_id);
    }

    /// Make every settings operation fail while `fail` is set.
    pub fn fail_settings(&self, fail: bool) {
        self.lock().fail_settings = fail;
    }

    /// Make session lookups fail while `fail` is set.
    pub fn fail_sessions(&self, fail: bool) {
        self.lock().fail_sessions = fail;
    }

    /// Make lookups of `club_id` fail.
    pub fn fail_club(&self, club_id: DbId) {
        self.lock().failing_clubs.insert(club_id);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn notifications_for(&self, user_id: DbId) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn stored_settings(&self, user_id: DbId) -> Option<NotificationSettings> {
        self.lock().settings.get(&user_id).cloned()
    }

    pub fn push_tokens(&self) -> Vec<PushToken> {
        self.lock().push_tokens.clone()
    }

    /// Rewrite a token's `updated_at`, to age it for cleanup tests.
    pub fn touch_token(&self, token: &str, updated_at: Timestamp) {
        for t in self.lock().push_tokens.iter_mut().filter(|t| t.token == token) {
            t.updated_at = updated_at;
        }
    }
}

fn storage_error(what: &str) -> NotifyError {
    NotifyError::Storage(format!("{what} unavailable"))
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, input: &NewNotification, now: Timestamp) -> NotifyResult<Notification> {
        if self.lock().failing_recipients.contains(&input.user_id) {
            return Err(storage_error("notifications"));
        }
        Ok(self.insert_notification(input, now))
    }

    async fn reminder_exists_since(
        &self,
        session_id: DbId,
        since: Timestamp,
    ) -> NotifyResult<bool> {
        Ok(self.lock().notifications.iter().any(|n| {
            n.kind == NotificationKind::SessionReminder
                && n.data["session_id"].as_i64() == Some(session_id)
                && n.created_at >= since
        }))
    }

    async fn mark_sent(&self, notification_id: DbId, sent_at: Timestamp) -> NotifyResult<()> {
        if let Some(n) = self
            .lock()
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            n.is_sent = true;
            n.sent_at = Some(sent_at);
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> NotifyResult<Vec<Notification>> {
        let mut rows: Vec<Notification> = self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn unread_count(&self, user_id: DbId) -> NotifyResult<i64> {
        let count = self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, notification_id: DbId, user_id: DbId) -> NotifyResult<bool> {
        let mut state = self.lock();
        let Some(n) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id && !n.is_read)
        else {
            return Ok(false);
        };
        n.is_read = true;
        Ok(true)
    }

    async fn mark_all_read(&self, user_id: DbId) -> NotifyResult<u64> {
        let mut changed = 0;
        for n in self
            .lock()
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_read_before(&self, cutoff: Timestamp) -> NotifyResult<u64> {
        let mut state = self.lock();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.is_read && n.created_at < cutoff));
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn find(&self, user_id: DbId) -> NotifyResult<Option<NotificationSettings>> {
        let state = self.lock();
        if state.fail_settings {
            return Err(storage_error("settings"));
        }
        Ok(state.settings.get(&user_id).cloned())
    }

    async fn get_or_create(&self, user_id: DbId) -> NotifyResult<NotificationSettings> {
        let mut state = self.lock();
        if state.fail_settings {
            return Err(storage_error("settings"));
        }
        Ok(state
            .settings
            .entry(user_id)
            .or_insert_with(|| NotificationSettings::defaults_for(user_id))
            .clone())
    }

    async fn save(&self, settings: &NotificationSettings) -> NotifyResult<NotificationSettings> {
        let mut state = self.lock();
        if state.fail_settings {
            return Err(storage_error("settings"));
        }
        state.settings.insert(settings.user_id, settings.clone());
        Ok(settings.clone())
    }
}

#[async_trait]
impl PushTokenStore for MemoryStore {
    async fn register(
        &self,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<PushToken> {
        let mut state = self.lock();

        for t in state.push_tokens.iter_mut().filter(|t| {
            t.user_id == user_id && t.platform == platform && t.token != token && t.is_active
        }) {
            t.is_active = false;
            t.updated_at = now;
        }

        if let Some(existing) = state
            .push_tokens
            .iter_mut()
            .find(|t| t.user_id == user_id && t.platform == platform && t.token == token)
        {
            existing.is_active = true;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = PushToken {
            id: state.next_id(),
            user_id,
            platform,
            token: token.to_string(),
            is_active: true,
            updated_at: now,
        };
        state.push_tokens.push(row.clone());
        Ok(row)
    }

    async fn deactivate(&self, user_id: DbId, token: &str, now: Timestamp) -> NotifyResult<bool> {
        let mut state = self.lock();
        let Some(t) = state
            .push_tokens
            .iter_mut()
            .find(|t| t.user_id == user_id && t.token == token && t.is_active)
        else {
            return Ok(false);
        };
        t.is_active = false;
        t.updated_at = now;
        Ok(true)
    }

    async fn list_active(
        &self,
        user_id: DbId,
        platform: Option<Platform>,
    ) -> NotifyResult<Vec<PushToken>> {
        let mut rows: Vec<PushToken> = self
            .lock()
            .push_tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.is_active)
            .filter(|t| platform.map_or(true, |p| p == t.platform))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.platform
                .as_str()
                .cmp(b.platform.as_str())
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn delete_inactive_before(&self, cutoff: Timestamp) -> NotifyResult<u64> {
        let mut state = self.lock();
        let before = state.push_tokens.len();
        state
            .push_tokens
            .retain(|t| t.is_active || t.updated_at >= cutoff);
        Ok((before - state.push_tokens.len()) as u64)
    }
}

#[async_trait]
impl SessionSource for MemoryStore {
    async fn list_planned_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> NotifyResult<Vec<Session>> {
        let state = self.lock();
        if state.fail_sessions {
            return Err(storage_error("sessions"));
        }
        let mut rows: Vec<Session> = state
            .sessions
            .iter()
            .filter(|s| {
                s.status == SessionStatus::Planned && s.scheduled_at >= from && s.scheduled_at <= to
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl ClubDirectory for MemoryStore {
    async fn find_club(&self, club_id: DbId) -> NotifyResult<Option<Club>> {
        let state = self.lock();
        if state.failing_clubs.contains(&club_id) {
            return Err(storage_error("clubs"));
        }
        Ok(state.clubs.iter().find(|c| c.id == club_id).cloned())
    }

    async fn find_user(&self, user_id: DbId) -> NotifyResult<Option<Member>> {
        Ok(self.lock().users.get(&user_id).cloned())
    }
}
