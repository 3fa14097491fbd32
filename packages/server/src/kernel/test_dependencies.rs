// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_client::ProviderStatus;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Map, Value};

use super::attachments::TextAttachmentProcessor;
use super::progress::ProgressHub;
use super::{
    BaseAI, BaseAnalysisStore, BaseSearchService, BaseWebScraper, ExtractedPage, SearchResult,
    ServerDeps,
};
use crate::common::{AnalysisId, AnalysisReport, AnalysisRequest};
use crate::domains::analysis::models::{
    AnalysisRecord, AnalysisStats, AnalysisSummary, ColumnUpdate, NewAnalysis,
};

fn mock_status(name: &str, available: bool, error_count: u32) -> ProviderStatus {
    ProviderStatus {
        name: name.to_string(),
        available,
        error_count,
        max_errors: 3,
        last_error: None,
    }
}

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<(String, u32)>>>,
    resets: Arc<Mutex<Vec<Option<String>>>>,
    available: bool,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            resets: Arc::new(Mutex::new(Vec::new())),
            available: true,
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.responses.lock().unwrap().push(Ok(json));
        self
    }

    /// Queue a provider failure
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    /// Report every provider as disabled in status calls
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Token ceilings passed with each call, in call order
    pub fn token_limits(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|(p, _)| p.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn resets(&self) -> Vec<Option<String>> {
        self.resets.lock().unwrap().clone()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        // Record the call
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return default mock response
            return Ok("Mock AI response".to_string());
        }
        responses.remove(0).map_err(|e| anyhow!(e))
    }

    fn provider_status(&self) -> Vec<ProviderStatus> {
        vec![mock_status("mock-ai", self.available, 0)]
    }

    fn reset_providers(&self, provider: Option<&str>) -> usize {
        self.resets
            .lock()
            .unwrap()
            .push(provider.map(str::to_string));
        1
    }
}

// =============================================================================
// Mock Search Service
// =============================================================================

pub struct MockSearchService {
    responses: Arc<Mutex<Vec<Vec<SearchResult>>>>,
    default_results: Vec<SearchResult>,
    queries: Arc<Mutex<Vec<(String, usize)>>>,
    failing: bool,
    available: bool,
}

impl MockSearchService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_results: Vec::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
            failing: false,
            available: true,
        }
    }

    /// Queue results for the next search
    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        self.responses.lock().unwrap().push(results);
        self
    }

    /// Results returned whenever the queue is empty
    pub fn with_default_results(mut self, results: Vec<SearchResult>) -> Self {
        self.default_results = results;
        self
    }

    /// Every search fails
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn max_results(&self) -> Vec<usize> {
        self.queries.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }
}

impl Default for MockSearchService {
    fn default() -> Self {
        Self::new()
    }
}

/// A search hit with a deterministic title and snippet.
pub fn search_result(url: &str) -> SearchResult {
    SearchResult {
        title: format!("Resultado {}", url),
        url: url.to_string(),
        snippet: format!("Resumo de {}", url),
        provider: "mock".to_string(),
        score: None,
    }
}

#[async_trait]
impl BaseSearchService for MockSearchService {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        if self.failing {
            return Err(anyhow!("mock search failure"));
        }

        let mut responses = self.responses.lock().unwrap();
        let results = if responses.is_empty() {
            self.default_results.clone()
        } else {
            responses.remove(0)
        };
        Ok(results.into_iter().take(max_results).collect())
    }

    fn provider_status(&self) -> Vec<ProviderStatus> {
        vec![mock_status("mock-search", self.available, u32::from(self.failing))]
    }

    fn reset_providers(&self, _provider: Option<&str>) -> usize {
        1
    }
}

// =============================================================================
// Mock Web Scraper
// =============================================================================

pub struct MockWebScraper {
    pages: HashMap<String, String>,
    default_content: Option<String>,
    failing_urls: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockWebScraper {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            default_content: None,
            failing_urls: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }

    /// Content returned for any URL without a specific page
    pub fn with_default_content(mut self, content: &str) -> Self {
        self.default_content = Some(content.to_string());
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing_urls.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_scraped(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|u| u == url)
    }
}

impl Default for MockWebScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebScraper for MockWebScraper {
    async fn extract(&self, url: &str) -> Result<Option<ExtractedPage>> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.failing_urls.iter().any(|u| u == url) {
            return Err(anyhow!("mock fetch failure for {}", url));
        }

        let content = self
            .pages
            .get(url)
            .cloned()
            .or_else(|| self.default_content.clone());

        Ok(content.map(|content| ExtractedPage {
            url: url.to_string(),
            title: None,
            content,
        }))
    }
}

// =============================================================================
// Mock Analysis Store
// =============================================================================

/// In-memory store with the same semantics as the Postgres adapter.
pub struct MockAnalysisStore {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
    fail_writes: bool,
    fail_ping: bool,
}

impl MockAnalysisStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_writes: false,
            fail_ping: false,
        }
    }

    /// `create` returns an error
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// `ping` (and so health checks) fails
    pub fn offline(mut self) -> Self {
        self.fail_ping = true;
        self
    }

    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockAnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAnalysisStore for MockAnalysisStore {
    async fn create(&self, request: &AnalysisRequest, report: &AnalysisReport) -> Result<AnalysisId> {
        if self.fail_writes {
            return Err(anyhow!("mock store write failure"));
        }
        let record = NewAnalysis::from_report(request, report)?.into_record(Utc::now());
        let id = record.id;
        self.records.lock().unwrap().push(record);
        Ok(id)
    }

    async fn update(&self, id: AnalysisId, fields: &Map<String, Value>) -> Result<bool> {
        let updates = ColumnUpdate::parse_all(fields)?;
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                for update in &updates {
                    record.apply(update);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: AnalysisId) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AnalysisSummary>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|r| AnalysisSummary {
                id: r.id,
                segment: r.segment.clone(),
                product: r.product.clone(),
                status: r.status.clone(),
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }

    async fn delete(&self, id: AnalysisId) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn stats(&self) -> Result<AnalysisStats> {
        let records = self.records.lock().unwrap();
        let week_ago = Utc::now() - ChronoDuration::days(7);
        let mut status_counts = std::collections::BTreeMap::new();
        for record in records.iter() {
            *status_counts.entry(record.status.clone()).or_insert(0) += 1;
        }
        Ok(AnalysisStats {
            total_analyses: records.len() as i64,
            status_counts,
            recent_analyses: records.iter().filter(|r| r.created_at >= week_ago).count() as i64,
            timestamp: Utc::now(),
        })
    }

    async fn ping(&self) -> Result<()> {
        if self.fail_ping {
            return Err(anyhow!("mock database offline"));
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub search: Arc<MockSearchService>,
    pub scraper: Arc<MockWebScraper>,
    pub store: Arc<MockAnalysisStore>,
    pub attachments: Arc<TextAttachmentProcessor>,
    pub progress: ProgressHub,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            search: Arc::new(MockSearchService::new()),
            scraper: Arc::new(MockWebScraper::new()),
            store: Arc::new(MockAnalysisStore::new()),
            attachments: Arc::new(TextAttachmentProcessor::new()),
            progress: ProgressHub::new(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock search service
    pub fn mock_search(mut self, search: MockSearchService) -> Self {
        self.search = Arc::new(search);
        self
    }

    /// Set a mock web scraper
    pub fn mock_scraper(mut self, scraper: MockWebScraper) -> Self {
        self.scraper = Arc::new(scraper);
        self
    }

    /// Set a mock store
    pub fn mock_store(mut self, store: MockAnalysisStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Convert into ServerDeps with no delay between research queries
    pub fn into_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.ai.clone(),
            self.search.clone(),
            self.scraper.clone(),
            self.store.clone(),
            self.attachments.clone(),
            self.progress.clone(),
            Duration::ZERO,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
