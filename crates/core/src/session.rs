//! Training sessions and club rosters, as seen by the reminder pipeline.
//!
//! These entities are owned by the wider application; the pipeline only
//! reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown session status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: DbId,
    pub name: String,
    pub scheduled_at: Timestamp,
    pub status: SessionStatus,
    /// The coach or athlete who created the session.
    pub user_id: DbId,
    pub club_id: Option<DbId>,
}

/// A user as listed in a club roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub user_id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Club {
    pub id: DbId,
    pub name: String,
    pub members: Vec<Member>,
}

/// A planned session inside the lead window, with everything needed to
/// pick its audience.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCandidate {
    pub session: Session,
    /// Club roster when the session belongs to a club.
    pub roster: Option<Vec<Member>>,
}

impl ReminderCandidate {
    /// Users who should hear about this session: the club roster, or the
    /// creator alone for sessions without a club.
    pub fn audience(&self) -> Vec<DbId> {
        match &self.roster {
            Some(members) => members.iter().map(|m| m.user_id).collect(),
            None => vec![self.session.user_id],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(club_id: Option<DbId>) -> Session {
        Session {
            id: 1,
            name: "Intervals".into(),
            scheduled_at: Utc::now(),
            status: SessionStatus::Planned,
            user_id: 10,
            club_id,
        }
    }

    #[test]
    fn audience_without_club_is_the_creator() {
        let candidate = ReminderCandidate {
            session: session(None),
            roster: None,
        };
        assert_eq!(candidate.audience(), vec![10]);
    }

    #[test]
    fn audience_with_club_is_the_roster() {
        let candidate = ReminderCandidate {
            session: session(Some(3)),
            roster: Some(vec![
                Member { user_id: 10, name: "Coach".into() },
                Member { user_id: 11, name: "Ana".into() },
            ]),
        };
        assert_eq!(candidate.audience(), vec![10, 11]);
    }

    #[test]
    fn status_parses() {
        assert_eq!("planned".parse::<SessionStatus>().unwrap(), SessionStatus::Planned);
        assert_eq!(
            "in_progress".parse::<SessionStatus>().unwrap(),
            SessionStatus::InProgress
        );
        assert!("postponed".parse::<SessionStatus>().is_err());
    }
}
