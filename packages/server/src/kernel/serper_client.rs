//! Serper.dev (Google results) search provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{SearchProvider, SearchResult};

const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

pub struct SerperClient {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl SerperClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            client,
            endpoint: SERPER_SEARCH_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    fn name(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({
                "q": query,
                "num": max_results,
                "gl": "br",
                "hl": "pt-br",
            }))
            .send()
            .await
            .context("Failed to send Serper search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Serper API error {}: {}", status, body);
        }

        let body: SerperResponse = response
            .json()
            .await
            .context("Failed to parse Serper response")?;

        Ok(body
            .organic
            .into_iter()
            .take(max_results)
            .enumerate()
            .map(|(rank, r)| SearchResult {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
                provider: "serper".to_string(),
                score: Some(1.0 / (rank as f64 + 1.0)),
            })
            .collect())
    }
}
