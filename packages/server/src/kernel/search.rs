//! Web search with ordered fallback across providers.

use std::sync::Arc;

use ai_client::{ProviderHealth, ProviderStatus};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::serper_client::SerperClient;
use super::tavily_client::TavilyClient;
use super::{BaseSearchService, SearchProvider, SearchResult};
use crate::config::Config;

struct SearchEntry {
    provider: Arc<dyn SearchProvider>,
    health: ProviderHealth,
}

/// Tries providers in registration order. A provider whose error counter
/// reached the threshold is skipped until reset. An empty result list moves
/// on to the next provider without counting as a failure.
pub struct SearchService {
    entries: Vec<SearchEntry>,
    max_errors: u32,
}

impl SearchService {
    pub fn new(max_errors: u32) -> Self {
        Self {
            entries: Vec::new(),
            max_errors,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        let health = ProviderHealth::new(provider.name(), self.max_errors);
        self.entries.push(SearchEntry { provider, health });
        self
    }

    /// Tavily first, Serper second. Providers without a key are left out.
    pub fn from_config(config: &Config) -> Self {
        let mut service = Self::new(config.provider_max_errors);

        if let Some(key) = &config.tavily_api_key {
            match TavilyClient::new(key.clone()) {
                Ok(client) => service = service.with_provider(Arc::new(client)),
                Err(e) => warn!(error = %e, "Failed to create Tavily client"),
            }
        }

        if let Some(key) = &config.serper_api_key {
            match SerperClient::new(key.clone()) {
                Ok(client) => service = service.with_provider(Arc::new(client)),
                Err(e) => warn!(error = %e, "Failed to create Serper client"),
            }
        }

        if service.entries.is_empty() {
            warn!("No search provider configured; web research will be empty");
        } else {
            info!(providers = service.entries.len(), "Search providers registered");
        }

        service
    }
}

#[async_trait]
impl BaseSearchService for SearchService {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let mut last_error: Option<String> = None;
        let mut any_answered = false;

        for entry in &self.entries {
            let name = entry.health.name();
            if !entry.health.is_available() {
                debug!(provider = name, "Skipping disabled search provider");
                continue;
            }

            match entry.provider.search(query, max_results).await {
                Ok(results) => {
                    entry.health.record_success();
                    any_answered = true;
                    if results.is_empty() {
                        debug!(provider = name, query, "Search provider returned no results");
                        continue;
                    }
                    info!(provider = name, query, count = results.len(), "Search succeeded");
                    return Ok(results);
                }
                Err(e) => {
                    let count = entry.health.record_failure(&e.to_string());
                    warn!(provider = name, query, error = %e, error_count = count, "Search provider failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        match (any_answered, last_error) {
            (true, _) => Ok(Vec::new()),
            (false, Some(e)) => Err(anyhow!("All search providers failed: {}", e)),
            (false, None) => Err(anyhow!("No search provider available")),
        }
    }

    fn provider_status(&self) -> Vec<ProviderStatus> {
        self.entries.iter().map(|e| e.health.status()).collect()
    }

    fn reset_providers(&self, provider: Option<&str>) -> usize {
        let mut reset = 0;
        for entry in &self.entries {
            if provider.map_or(true, |p| p == entry.health.name()) {
                entry.health.reset();
                reset += 1;
            }
        }
        reset
    }
}
