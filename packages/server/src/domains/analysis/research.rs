//! Web research: templated queries, top-result extraction and aggregation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::common::{AnalysisRequest, QueryResearch, ResearchHit, WebResearch};
use crate::kernel::{BaseSearchService, BaseWebScraper, SearchResult};

pub const RESULTS_PER_QUERY: usize = 15;
pub const EXTRACTIONS_PER_QUERY: usize = 5;

/// The ten research queries, starting with the request's effective query.
pub fn research_queries(request: &AnalysisRequest) -> Vec<String> {
    let seg = request.segment();
    vec![
        request.effective_query(),
        format!("análise mercado {} Brasil tendências", seg),
        format!("concorrentes {} principais players", seg),
        format!("público-alvo {} perfil demográfico", seg),
        format!("preços {} ticket médio mercado", seg),
        format!("oportunidades {} gaps mercado", seg),
        format!("futuro {} projeções crescimento", seg),
        format!("cases sucesso {} empresas brasileiras", seg),
        format!("dados estatísticos {} IBGE pesquisas", seg),
        format!("investimentos {} venture capital funding", seg),
    ]
}

pub struct WebResearcher {
    search: Arc<dyn BaseSearchService>,
    scraper: Arc<dyn BaseWebScraper>,
    delay: Duration,
}

impl WebResearcher {
    pub fn new(
        search: Arc<dyn BaseSearchService>,
        scraper: Arc<dyn BaseWebScraper>,
        delay: Duration,
    ) -> Self {
        Self {
            search,
            scraper,
            delay,
        }
    }

    /// Run every query. Search and extraction errors are logged and skipped,
    /// so this never fails.
    pub async fn run(&self, request: &AnalysisRequest) -> WebResearch {
        let queries = research_queries(request);
        let mut research = WebResearch {
            total_queries: queries.len(),
            executed_queries: queries.clone(),
            ..Default::default()
        };

        // Extraction result per URL, shared across queries.
        let mut extracted: HashMap<String, Option<String>> = HashMap::new();
        let mut seen_sources = HashSet::new();

        for (index, query) in queries.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let results = match self.search.search(query, RESULTS_PER_QUERY).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(query = %query, error = %e, "Research query failed");
                    continue;
                }
            };
            debug!(query = %query, results = results.len(), "Research query answered");

            let mut hits = Vec::with_capacity(results.len());
            for (rank, result) in results.into_iter().enumerate() {
                if seen_sources.insert(result.url.clone()) {
                    research.unique_sources.push(result.url.clone());
                }

                let content = if rank < EXTRACTIONS_PER_QUERY {
                    self.extract_cached(&result.url, &mut extracted).await
                } else {
                    None
                };
                if let Some(content) = &content {
                    research.extracted_chars += content.chars().count();
                }

                hits.push(into_hit(result, content));
            }

            research.total_results += hits.len();
            research.detailed_results.push(QueryResearch {
                query: query.clone(),
                results: hits,
            });
        }

        info!(
            queries = research.total_queries,
            results = research.total_results,
            extracted_chars = research.extracted_chars,
            sources = research.unique_sources.len(),
            "Web research finished"
        );

        research
    }

    async fn extract_cached(
        &self,
        url: &str,
        cache: &mut HashMap<String, Option<String>>,
    ) -> Option<String> {
        if let Some(cached) = cache.get(url) {
            return cached.clone();
        }

        let content = match self.scraper.extract(url).await {
            Ok(page) => page.map(|p| p.content),
            Err(e) => {
                warn!(url = %url, error = %e, "Content extraction failed");
                None
            }
        };
        cache.insert(url.to_string(), content.clone());
        content
    }
}

fn into_hit(result: SearchResult, content: Option<String>) -> ResearchHit {
    ResearchHit {
        title: result.title,
        url: result.url,
        snippet: result.snippet,
        provider: result.provider,
        extracted_content: content,
    }
}
