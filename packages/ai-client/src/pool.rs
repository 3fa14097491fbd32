//! Ordered fallback across LLM providers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AiError, Result};
use crate::health::{ProviderHealth, ProviderStatus};
use crate::provider::LlmProvider;
use crate::types::Completion;

struct PoolEntry {
    provider: Arc<dyn LlmProvider>,
    health: ProviderHealth,
}

/// Tries providers in registration order, skipping those whose error counter
/// has reached the threshold. An empty answer counts as a failure.
pub struct ProviderPool {
    entries: Vec<PoolEntry>,
    max_errors: u32,
}

impl ProviderPool {
    pub fn new(max_errors: u32) -> Self {
        Self {
            entries: Vec::new(),
            max_errors,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        let health = ProviderHealth::new(provider.name(), self.max_errors);
        self.entries.push(PoolEntry { provider, health });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_available(&self) -> bool {
        self.entries.iter().any(|e| e.health.is_available())
    }

    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion> {
        let mut last_error: Option<String> = None;

        for entry in &self.entries {
            let name = entry.health.name();
            if !entry.health.is_available() {
                debug!(provider = name, "Skipping disabled LLM provider");
                continue;
            }

            let outcome = match entry.provider.complete(prompt, max_tokens).await {
                Ok(completion) if completion.text.trim().is_empty() => {
                    Err(AiError::EmptyResponse(name.to_string()))
                }
                other => other,
            };

            match outcome {
                Ok(completion) => {
                    entry.health.record_success();
                    info!(
                        provider = name,
                        chars = completion.text.len(),
                        "LLM completion succeeded"
                    );
                    return Ok(completion);
                }
                Err(e) => {
                    let count = entry.health.record_failure(&e.to_string());
                    warn!(provider = name, error = %e, error_count = count, "LLM provider failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        match last_error {
            Some(error) => Err(AiError::AllProvidersFailed(error)),
            None => Err(AiError::NoProviderAvailable),
        }
    }

    pub fn status(&self) -> Vec<ProviderStatus> {
        self.entries.iter().map(|e| e.health.status()).collect()
    }

    /// Reset one provider by name, or all when `provider` is `None`.
    /// Returns how many providers were reset.
    pub fn reset(&self, provider: Option<&str>) -> usize {
        let mut reset = 0;
        for entry in &self.entries {
            if provider.map_or(true, |name| name == entry.health.name()) {
                entry.health.reset();
                reset += 1;
            }
        }
        reset
    }
}
