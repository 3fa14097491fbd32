//! Server dependencies (using traits for testability)
//!
//! Central container handed to the pipeline and the HTTP layer. Every
//! external service sits behind a trait so tests can swap in mocks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;

use super::ai::build_provider_pool;
use super::attachments::TextAttachmentProcessor;
use super::progress::ProgressHub;
use super::search::SearchService;
use super::simple_scraper::SimpleScraper;
use super::{BaseAI, BaseAnalysisStore, BaseAttachmentProcessor, BaseSearchService, BaseWebScraper};
use crate::config::Config;
use crate::domains::analysis::PgAnalysisStore;

#[derive(Clone)]
pub struct ServerDeps {
    /// LLM provider chain.
    pub ai: Arc<dyn BaseAI>,
    pub search: Arc<dyn BaseSearchService>,
    pub scraper: Arc<dyn BaseWebScraper>,
    pub store: Arc<dyn BaseAnalysisStore>,
    pub attachments: Arc<dyn BaseAttachmentProcessor>,
    /// Per-session progress for polling and SSE.
    pub progress: ProgressHub,
    /// Pause between web research queries.
    pub research_delay: Duration,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        search: Arc<dyn BaseSearchService>,
        scraper: Arc<dyn BaseWebScraper>,
        store: Arc<dyn BaseAnalysisStore>,
        attachments: Arc<dyn BaseAttachmentProcessor>,
        progress: ProgressHub,
        research_delay: Duration,
    ) -> Self {
        Self {
            ai,
            search,
            scraper,
            store,
            attachments,
            progress,
            research_delay,
        }
    }

    /// Production wiring from configuration and a connected pool.
    pub fn from_config(config: &Config, pool: PgPool) -> Result<Self> {
        Ok(Self::new(
            Arc::new(build_provider_pool(config)),
            Arc::new(SearchService::from_config(config)),
            Arc::new(SimpleScraper::new()?),
            Arc::new(PgAnalysisStore::new(pool)),
            Arc::new(TextAttachmentProcessor::new()),
            ProgressHub::new(),
            Duration::from_millis(config.research_query_delay_ms),
        ))
    }
}
