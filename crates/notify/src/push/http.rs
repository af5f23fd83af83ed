//! Push delivery through an HTTP gateway.
//!
//! The batch is posted as JSON to a single gateway URL which answers with a
//! [`PushResponse`]. Token-level failures are part of a successful response;
//! only transport errors and non-2xx statuses become [`PushError`]s.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use trainhub_core::push::PushMessage;

use super::{PushError, PushProvider, PushResponse};

#[derive(Serialize)]
struct GatewayRequest<'a> {
    tokens: &'a [String],
    notification: GatewayNotification<'a>,
    data: &'a serde_json::Value,
}

#[derive(Serialize)]
struct GatewayNotification<'a> {
    title: &'a str,
    body: &'a str,
}

pub struct HttpPushProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpPushProvider {
    /// Build a provider posting to `url`, with `timeout` per request.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PushProvider for HttpPushProvider {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushResponse, PushError> {
        let body = GatewayRequest {
            tokens,
            notification: GatewayNotification {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }

        let parsed: PushResponse = response.json().await?;
        tracing::debug!(
            url = %self.url,
            success_count = parsed.success_count,
            failure_count = parsed.failure_count,
            "Push gateway accepted batch"
        );
        Ok(parsed)
    }
}
