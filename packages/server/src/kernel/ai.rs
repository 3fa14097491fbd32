//! Wires the `ai-client` provider pool into the kernel's [`BaseAI`] seam.

use std::sync::Arc;

use ai_client::{Anthropic, OpenAi, ProviderPool, ProviderStatus};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::BaseAI;
use crate::config::Config;

/// Build the LLM fallback chain from configuration: OpenAI first, then
/// Anthropic. Providers without an API key are left out.
pub fn build_provider_pool(config: &Config) -> ProviderPool {
    let mut pool = ProviderPool::new(config.provider_max_errors);

    if let Some(key) = &config.openai_api_key {
        match OpenAi::new(key.clone(), config.openai_model.clone()) {
            Ok(client) => {
                info!(model = client.model(), "OpenAI provider registered");
                pool = pool.with_provider(Arc::new(client));
            }
            Err(e) => warn!(error = %e, "Failed to create OpenAI client"),
        }
    }

    if let Some(key) = &config.anthropic_api_key {
        match Anthropic::new(key.clone(), config.anthropic_model.clone()) {
            Ok(client) => {
                info!(model = client.model(), "Anthropic provider registered");
                pool = pool.with_provider(Arc::new(client));
            }
            Err(e) => warn!(error = %e, "Failed to create Anthropic client"),
        }
    }

    if pool.is_empty() {
        warn!("No LLM provider configured; every generated section will use its fallback");
    }

    pool
}

#[async_trait]
impl BaseAI for ProviderPool {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let completion = ProviderPool::complete(self, prompt, max_tokens).await?;
        Ok(completion.text)
    }

    fn provider_status(&self) -> Vec<ProviderStatus> {
        self.status()
    }

    fn reset_providers(&self, provider: Option<&str>) -> usize {
        self.reset(provider)
    }
}
