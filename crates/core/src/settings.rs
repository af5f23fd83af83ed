//! Per-user notification preferences.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::notification::NotificationKind;
use crate::types::DbId;

pub const DEFAULT_REMINDER_HOURS: i32 = 24;
pub const MIN_REMINDER_HOURS: i32 = 1;
pub const MAX_REMINDER_HOURS: i32 = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationSettings {
    pub user_id: DbId,
    pub session_reminders: bool,
    pub exercise_notifications: bool,
    pub system_notifications: bool,
    /// Maximum lead time, in hours, at which a reminder is still wanted.
    pub reminder_hours: i32,
}

impl NotificationSettings {
    /// Settings a user gets before ever touching them.
    pub fn defaults_for(user_id: DbId) -> Self {
        Self {
            user_id,
            session_reminders: true,
            exercise_notifications: true,
            system_notifications: true,
            reminder_hours: DEFAULT_REMINDER_HOURS,
        }
    }

    /// Whether the category toggle for `kind` is on.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::SessionReminder => self.session_reminders,
            NotificationKind::ExerciseAddedToClub => self.exercise_notifications,
            NotificationKind::MemberJoinedClub | NotificationKind::SystemNotification => {
                self.system_notifications
            }
        }
    }

    /// A reminder `hours_before` a session is wanted only if reminders are on
    /// and the lead time does not exceed the user's horizon.
    pub fn wants_session_reminder(&self, hours_before: i64) -> bool {
        self.session_reminders && hours_before <= i64::from(self.reminder_hours)
    }

    /// Apply a partial update after validating it.
    pub fn apply(&mut self, update: &UpdateNotificationSettings) -> Result<(), CoreError> {
        update
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if let Some(v) = update.session_reminders {
            self.session_reminders = v;
        }
        if let Some(v) = update.exercise_notifications {
            self.exercise_notifications = v;
        }
        if let Some(v) = update.system_notifications {
            self.system_notifications = v;
        }
        if let Some(v) = update.reminder_hours {
            self.reminder_hours = v;
        }
        Ok(())
    }
}

/// Partial update of a user's settings. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNotificationSettings {
    pub session_reminders: Option<bool>,
    pub exercise_notifications: Option<bool>,
    pub system_notifications: Option<bool>,
    #[validate(range(min = 1, max = 48))]
    pub reminder_hours: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = NotificationSettings::defaults_for(5);
        assert!(s.session_reminders && s.exercise_notifications && s.system_notifications);
        assert_eq!(s.reminder_hours, 24);
    }

    #[test]
    fn reminder_gate_respects_toggle_and_horizon() {
        let mut s = NotificationSettings::defaults_for(1);
        assert!(s.wants_session_reminder(20));
        assert!(s.wants_session_reminder(24));
        assert!(!s.wants_session_reminder(25));

        s.reminder_hours = 6;
        assert!(!s.wants_session_reminder(20));
        assert!(s.wants_session_reminder(6));

        s.session_reminders = false;
        assert!(!s.wants_session_reminder(1));
    }

    #[test]
    fn category_toggles_map_to_kinds() {
        let mut s = NotificationSettings::defaults_for(1);
        s.system_notifications = false;
        assert!(!s.allows(NotificationKind::MemberJoinedClub));
        assert!(!s.allows(NotificationKind::SystemNotification));
        assert!(s.allows(NotificationKind::ExerciseAddedToClub));
        assert!(s.allows(NotificationKind::SessionReminder));
    }

    #[test]
    fn apply_rejects_out_of_range_hours() {
        let mut s = NotificationSettings::defaults_for(1);
        let update = UpdateNotificationSettings {
            reminder_hours: Some(49),
            ..Default::default()
        };
        assert!(matches!(s.apply(&update), Err(CoreError::Validation(_))));
        assert_eq!(s.reminder_hours, 24);

        let update = UpdateNotificationSettings {
            reminder_hours: Some(0),
            ..Default::default()
        };
        assert!(s.apply(&update).is_err());
    }

    #[test]
    fn apply_changes_only_present_fields() {
        let mut s = NotificationSettings::defaults_for(1);
        let update = UpdateNotificationSettings {
            exercise_notifications: Some(false),
            reminder_hours: Some(48),
            ..Default::default()
        };
        s.apply(&update).unwrap();
        assert!(!s.exercise_notifications);
        assert!(s.session_reminders);
        assert_eq!(s.reminder_hours, 48);
    }
}
