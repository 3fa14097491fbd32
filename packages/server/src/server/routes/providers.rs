//! Provider status, resets and passthrough probes.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::kernel::ServerDeps;
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub const TEST_AI_MAX_TOKENS: u32 = 500;
pub const TEST_SEARCH_MAX_RESULTS: usize = 10;
const TEST_SEARCH_DEFAULT_RESULTS: usize = 5;
const TEST_SEARCH_DEFAULT_QUERY: &str = "mercado digital Brasil tendências";
const TEST_AI_DEFAULT_PROMPT: &str = "Responda apenas com: OK";

/// Overall health as reported by `/status` and `/stats`.
pub(crate) struct SystemHealth {
    pub healthy: bool,
    pub database: Value,
}

pub(crate) async fn system_health(deps: &ServerDeps) -> SystemHealth {
    let database_ok = deps.store.ping().await;
    let database = match &database_ok {
        Ok(()) => json!({ "status": "ok" }),
        Err(e) => json!({ "status": "error", "error": e.to_string() }),
    };

    let ai_ready = deps.ai.provider_status().iter().any(|p| p.available);
    let search_ready = deps.search.provider_status().iter().any(|p| p.available);

    SystemHealth {
        healthy: ai_ready && search_ready && database_ok.is_ok(),
        database,
    }
}

pub(crate) fn health_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "degraded"
    }
}

pub async fn status_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    let deps = &state.deps;
    let health = system_health(deps).await;

    Json(json!({
        "status": health_label(health.healthy),
        "ai_providers": deps.ai.provider_status(),
        "search_providers": deps.search.provider_status(),
        "database": health.database,
        "content_extraction": { "available": true, "engine": "html" },
        "timestamp": Utc::now(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetProvidersRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub provider: Option<String>,
}

pub async fn reset_providers_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ResetProvidersRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::bad_request(format!("Dados inválidos: {}", e.body_text())))?;
    let provider = body.provider.as_deref().filter(|p| !p.trim().is_empty());

    let reset = match body.kind.as_deref() {
        Some("ai") => state.deps.ai.reset_providers(provider),
        Some("search") => state.deps.search.reset_providers(provider),
        _ => {
            return Err(ApiError::bad_request(
                "Tipo de provedor inválido: use 'ai' ou 'search'",
            ))
        }
    };

    info!(kind = ?body.kind, provider = ?provider, reset, "Provider errors reset");

    Ok(Json(json!({
        "success": true,
        "type": body.kind,
        "provider": provider,
        "reset": reset,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct TestSearchRequest {
    pub query: Option<String>,
    pub max_results: Option<usize>,
}

pub async fn test_search_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<TestSearchRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    let query = body
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| TEST_SEARCH_DEFAULT_QUERY.to_string());
    let max_results = body
        .max_results
        .unwrap_or(TEST_SEARCH_DEFAULT_RESULTS)
        .clamp(1, TEST_SEARCH_MAX_RESULTS);

    let results = state.deps.search.search(&query, max_results).await?;

    Ok(Json(json!({
        "query": query,
        "max_results": max_results,
        "total": results.len(),
        "results": results,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct TestAiRequest {
    pub prompt: Option<String>,
}

pub async fn test_ai_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<TestAiRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| TEST_AI_DEFAULT_PROMPT.to_string());

    let response = state.deps.ai.complete(&prompt, TEST_AI_MAX_TOKENS).await?;

    Ok(Json(json!({
        "prompt": prompt,
        "response": response,
    })))
}
