//! Push providers.
//!
//! A [`PushProvider`] delivers one message to a batch of device tokens and
//! reports a per-token outcome. Delivery itself is external; the pipeline
//! only sees the counts.

pub mod http;
pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trainhub_core::push::PushMessage;

pub use http::HttpPushProvider;
pub use simulated::SimulatedPushProvider;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The request to the push gateway failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Push provider rejected the batch: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Outcome for a single device token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
    pub token: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one batched send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResponse {
    pub success_count: u32,
    pub failure_count: u32,
    #[serde(default)]
    pub results: Vec<TokenResult>,
}

impl PushResponse {
    /// Build a response from per-token results, deriving the counts.
    pub fn from_results(results: Vec<TokenResult>) -> Self {
        let success_count = results.iter().filter(|r| r.success).count() as u32;
        Self {
            success_count,
            failure_count: results.len() as u32 - success_count,
            results,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Send `message` to every token in one batch.
    async fn send(&self, tokens: &[String], message: &PushMessage)
        -> Result<PushResponse, PushError>;
}
