use async_trait::async_trait;

use crate::error::Result;
use crate::types::Completion;

/// A single LLM backend.
///
/// Implementations send one prompt and return the raw text answer. Fallback,
/// error accounting and availability live in [`crate::ProviderPool`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable provider name used in status reports and reset requests.
    fn name(&self) -> &str;

    /// Complete `prompt`, producing at most `max_tokens` tokens.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion>;
}
