//! Notification kinds, the stored notification entity, and the
//! constructors that build title/message/payload for each kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reminder::REMINDER_LABEL;
use crate::session::Session;
use crate::types::{DbId, Timestamp};

/// What a notification is about. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SessionReminder,
    ExerciseAddedToClub,
    MemberJoinedClub,
    SystemNotification,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SessionReminder => "session_reminder",
            Self::ExerciseAddedToClub => "exercise_added_to_club",
            Self::MemberJoinedClub => "member_joined_club",
            Self::SystemNotification => "system_notification",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session_reminder" => Ok(Self::SessionReminder),
            "exercise_added_to_club" => Ok(Self::ExerciseAddedToClub),
            "member_joined_club" => Ok(Self::MemberJoinedClub),
            "system_notification" => Ok(Self::SystemNotification),
            other => Err(CoreError::Validation(format!(
                "Unknown notification kind: {other}"
            ))),
        }
    }
}

/// A persisted notification. One row per recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub is_sent: bool,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

/// Structured payload attached to session reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReminderPayload {
    pub session_id: DbId,
    pub session_name: String,
    /// ISO-8601 / RFC 3339 date of the session.
    pub session_date: String,
    /// Whole hours until the session, rounded up.
    pub hours_before_session: i64,
}

impl NewNotification {
    /// Reminder for an upcoming session.
    ///
    /// The message always uses the flat 24-hour wording, whatever the
    /// actual lead time carried in the payload.
    pub fn session_reminder(user_id: DbId, session: &Session, hours_before_session: i64) -> Self {
        let payload = SessionReminderPayload {
            session_id: session.id,
            session_name: session.name.clone(),
            session_date: session.scheduled_at.to_rfc3339(),
            hours_before_session,
        };
        Self {
            user_id,
            kind: NotificationKind::SessionReminder,
            title: format!("Rappel : {}", session.name),
            message: format!(
                "Votre séance \"{}\" commence dans {REMINDER_LABEL}.",
                session.name
            ),
            data: serde_json::to_value(&payload).unwrap_or_default(),
        }
    }

    pub fn exercise_added(
        user_id: DbId,
        club_id: DbId,
        club_name: &str,
        exercise_name: &str,
        added_by_name: &str,
    ) -> Self {
        Self {
            user_id,
            kind: NotificationKind::ExerciseAddedToClub,
            title: "Nouvel exercice".to_string(),
            message: format!(
                "{added_by_name} a ajouté l'exercice \"{exercise_name}\" au club {club_name}."
            ),
            data: serde_json::json!({
                "club_id": club_id,
                "club_name": club_name,
                "exercise_name": exercise_name,
            }),
        }
    }

    pub fn member_joined(
        user_id: DbId,
        club_id: DbId,
        club_name: &str,
        member_id: DbId,
        member_name: &str,
    ) -> Self {
        Self {
            user_id,
            kind: NotificationKind::MemberJoinedClub,
            title: "Nouveau membre".to_string(),
            message: format!("{member_name} a rejoint le club {club_name}."),
            data: serde_json::json!({
                "club_id": club_id,
                "club_name": club_name,
                "member_id": member_id,
            }),
        }
    }
}
