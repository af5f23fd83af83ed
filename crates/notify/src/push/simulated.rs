//! Provider that logs instead of delivering.

use async_trait::async_trait;
use trainhub_core::push::PushMessage;

use super::{PushError, PushProvider, PushResponse, TokenResult};

/// Reports every token as delivered. Used when no push gateway is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedPushProvider;

#[async_trait]
impl PushProvider for SimulatedPushProvider {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushResponse, PushError> {
        tracing::info!(
            token_count = tokens.len(),
            title = %message.title,
            "Simulated push delivery"
        );
        let results = tokens
            .iter()
            .map(|token| TokenResult {
                token: token.clone(),
                success: true,
                error: None,
            })
            .collect();
        Ok(PushResponse::from_results(results))
    }
}
