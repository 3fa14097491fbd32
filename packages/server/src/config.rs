use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub tavily_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    /// Consecutive failures before a provider is skipped.
    pub provider_max_errors: u32,
    /// Pause between research queries.
    pub research_query_delay_ms: u64,
}

/// Unset and blank variables are both treated as absent.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            anthropic_model: optional("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            tavily_api_key: optional("TAVILY_API_KEY"),
            serper_api_key: optional("SERPER_API_KEY"),
            provider_max_errors: optional("PROVIDER_MAX_ERRORS")
                .unwrap_or_else(|| ai_client::DEFAULT_MAX_ERRORS.to_string())
                .parse()
                .context("PROVIDER_MAX_ERRORS must be a positive number")?,
            research_query_delay_ms: optional("RESEARCH_QUERY_DELAY_MS")
                .unwrap_or_else(|| "1000".to_string())
                .parse()
                .context("RESEARCH_QUERY_DELAY_MS must be a number of milliseconds")?,
        })
    }
}
