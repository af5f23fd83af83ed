//! Device token registry.

use std::sync::Arc;

use trainhub_core::error::CoreError;
use trainhub_core::push::{Platform, PushToken};
use trainhub_core::types::{DbId, Timestamp};

use crate::error::{NotifyError, NotifyResult};
use crate::store::PushTokenStore;

/// Longest accepted device token.
pub const MAX_TOKEN_LEN: usize = 512;

#[derive(Clone)]
pub struct PushTokenRegistry {
    store: Arc<dyn PushTokenStore>,
}

impl PushTokenRegistry {
    pub fn new(store: Arc<dyn PushTokenStore>) -> Self {
        Self { store }
    }

    /// Register `token` as the user's only active token on `platform`.
    ///
    /// Any other active token for the same platform is deactivated in the
    /// same step. Re-registering a known token reactivates it.
    pub async fn register(
        &self,
        user_id: DbId,
        platform: Platform,
        token: &str,
        now: Timestamp,
    ) -> NotifyResult<PushToken> {
        let token = token.trim();
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(NotifyError::Core(CoreError::Validation(format!(
                "Push token must be 1 to {MAX_TOKEN_LEN} characters"
            ))));
        }

        let registered = self.store.register(user_id, platform, token, now).await?;
        tracing::info!(user_id, platform = %platform, "Push token registered");
        Ok(registered)
    }

    /// Deactivate a token. Returns `false` if it was unknown or already inactive.
    pub async fn remove(&self, user_id: DbId, token: &str, now: Timestamp) -> NotifyResult<bool> {
        let removed = self.store.deactivate(user_id, token, now).await?;
        if removed {
            tracing::info!(user_id, "Push token deactivated");
        }
        Ok(removed)
    }

    pub async fn active_tokens(
        &self,
        user_id: DbId,
        platform: Option<Platform>,
    ) -> NotifyResult<Vec<PushToken>> {
        self.store.list_active(user_id, platform).await
    }

    /// Hard-delete tokens that have been inactive since before `cutoff`.
    pub async fn delete_inactive_before(&self, cutoff: Timestamp) -> NotifyResult<u64> {
        self.store.delete_inactive_before(cutoff).await
    }
}
