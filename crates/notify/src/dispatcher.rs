//! Sends stored notifications to the recipient's devices.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use trainhub_core::notification::Notification;
use trainhub_core::push::PushMessage;
use trainhub_core::types::Timestamp;

use crate::error::{NotifyError, NotifyResult};
use crate::push::PushProvider;
use crate::store::{NotificationStore, PushTokenStore};

/// Default bound on a single provider call.
pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The recipient has no active device. The notification stays unsent.
    NoTokens,
    Sent {
        success_count: u32,
        failure_count: u32,
    },
    /// Provider error or timeout. The notification stays unsent.
    Failed { reason: String },
}

#[derive(Clone)]
pub struct PushDispatcher {
    tokens: Arc<dyn PushTokenStore>,
    notifications: Arc<dyn NotificationStore>,
    provider: Arc<dyn PushProvider>,
    timeout: Duration,
}

impl PushDispatcher {
    pub fn new(
        tokens: Arc<dyn PushTokenStore>,
        notifications: Arc<dyn NotificationStore>,
        provider: Arc<dyn PushProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            notifications,
            provider,
            timeout,
        }
    }

    /// Push `notification` to every active token of its recipient in one
    /// batch and mark it sent once the provider answers.
    ///
    /// Provider failures and timeouts are reported as
    /// [`DispatchOutcome::Failed`]; only storage errors are returned as `Err`.
    pub async fn dispatch(
        &self,
        notification: &Notification,
        now: Timestamp,
    ) -> NotifyResult<DispatchOutcome> {
        let user_id = notification.user_id;
        let tokens: Vec<String> = self
            .tokens
            .list_active(user_id, None)
            .await?
            .into_iter()
            .map(|t| t.token)
            .collect();

        if tokens.is_empty() {
            tracing::debug!(
                notification_id = notification.id,
                user_id,
                "No active push tokens"
            );
            return Ok(DispatchOutcome::NoTokens);
        }

        let message = PushMessage {
            title: notification.title.clone(),
            body: notification.message.clone(),
            data: notification.data.clone(),
        };

        let sent = match tokio::time::timeout(self.timeout, self.provider.send(&tokens, &message))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Ok(self.failed(notification, NotifyError::Push(e))),
            Err(_) => return Ok(self.failed(notification, NotifyError::Timeout(self.timeout))),
        };

        self.notifications.mark_sent(notification.id, now).await?;
        tracing::info!(
            notification_id = notification.id,
            user_id,
            success_count = sent.success_count,
            failure_count = sent.failure_count,
            "Push notification sent"
        );
        Ok(DispatchOutcome::Sent {
            success_count: sent.success_count,
            failure_count: sent.failure_count,
        })
    }

    fn failed(&self, notification: &Notification, error: NotifyError) -> DispatchOutcome {
        tracing::warn!(
            notification_id = notification.id,
            user_id = notification.user_id,
            error = %error,
            "Push dispatch failed"
        );
        DispatchOutcome::Failed {
            reason: error.to_string(),
        }
    }
}
