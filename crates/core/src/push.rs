//! Push device tokens and the message shape handed to a push provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "web" => Ok(Self::Web),
            other => Err(CoreError::Validation(format!("Unknown platform: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushToken {
    pub id: DbId,
    pub user_id: DbId,
    pub platform: Platform,
    pub token: String,
    pub is_active: bool,
    pub updated_at: Timestamp,
}

/// One push message fanned out to every active token of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}
