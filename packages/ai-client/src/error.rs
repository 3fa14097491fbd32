//! Error types for the LLM client.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, AiError>;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// Configuration error (missing API key, client construction failed)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider answered with no text
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Every registered provider is disabled by its error counter
    #[error("No LLM provider available")]
    NoProviderAvailable,

    /// Every available provider was tried and failed
    #[error("All LLM providers failed, last error: {0}")]
    AllProvidersFailed(String),
}
