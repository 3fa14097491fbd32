// Trait abstractions for every external collaborator.
//
// The pipeline and the HTTP layer only see these traits; production wiring and
// test mocks both live in this module's siblings.

use ai_client::ProviderStatus;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::common::{AnalysisId, AnalysisReport, AnalysisRequest};
use crate::domains::analysis::models::{AnalysisRecord, AnalysisStats, AnalysisSummary};

// =============================================================================
// AI Trait
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt, producing at most `max_tokens` tokens.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    fn provider_status(&self) -> Vec<ProviderStatus>;

    /// Clear error counters for one provider, or all when `None`.
    fn reset_providers(&self, provider: Option<&str>) -> usize;
}

// =============================================================================
// Search Traits
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One external search API.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Search with fallback across providers.
#[async_trait]
pub trait BaseSearchService: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    fn provider_status(&self) -> Vec<ProviderStatus>;

    fn reset_providers(&self, provider: Option<&str>) -> usize;
}

// =============================================================================
// Content Extraction Trait
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
}

#[async_trait]
pub trait BaseWebScraper: Send + Sync {
    /// Fetch a page and return its main text, or `None` when the page has too
    /// little content to be useful.
    async fn extract(&self, url: &str) -> Result<Option<ExtractedPage>>;
}

// =============================================================================
// Persistence Trait
// =============================================================================

#[async_trait]
pub trait BaseAnalysisStore: Send + Sync {
    async fn create(&self, request: &AnalysisRequest, report: &AnalysisReport)
        -> Result<AnalysisId>;

    /// Set allow-listed columns. Returns false when the row does not exist.
    async fn update(&self, id: AnalysisId, fields: &serde_json::Map<String, Value>)
        -> Result<bool>;

    async fn get(&self, id: AnalysisId) -> Result<Option<AnalysisRecord>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AnalysisSummary>>;

    async fn delete(&self, id: AnalysisId) -> Result<bool>;

    async fn stats(&self) -> Result<AnalysisStats>;

    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Attachment Trait
// =============================================================================

#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    pub session_id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub extracted_chars: usize,
    pub preview: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum AttachmentError {
    #[error("Arquivo vazio")]
    Empty,
    #[error("Arquivo excede o limite de {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Tipo de arquivo não suportado: {0}")]
    Unsupported(String),
    #[error("Anexos da sessão excedem o limite de {limit} bytes")]
    SessionFull { limit: usize },
}

#[async_trait]
pub trait BaseAttachmentProcessor: Send + Sync {
    async fn process(
        &self,
        session_id: &str,
        upload: Upload,
    ) -> std::result::Result<AttachmentSummary, AttachmentError>;

    /// Text of every attachment uploaded in a session, if any.
    async fn session_context(&self, session_id: &str) -> Option<String>;
}

// =============================================================================
// Progress Trait
// =============================================================================

/// Receives one call per pipeline stage.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_stage(&self, step: usize, total: usize, message: &str);

    async fn on_complete(&self) {}
}
