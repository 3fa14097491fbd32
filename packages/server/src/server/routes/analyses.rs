//! Stored analyses: listing, lookup, update, delete and stats.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::providers::{health_label, system_health};
use crate::common::AnalysisId;
use crate::domains::analysis::models::{AnalysisRecord, UpdateError};
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

pub(crate) fn parse_id(raw: &str) -> Result<AnalysisId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("ID inválido: {}", raw)))
}

pub(crate) async fn find_analysis(state: &AppState, raw_id: &str) -> Result<AnalysisRecord, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .deps
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Análise não encontrada"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub async fn list_analyses_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = (query.limit(), query.offset());
    let analyses = state.deps.store.list(limit, offset).await?;

    Ok(Json(json!({
        "analyses": analyses,
        "count": analyses.len(),
        "limit": limit,
        "offset": offset,
    })))
}

pub async fn get_analysis_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    Ok(Json(find_analysis(&state, &id).await?))
}

pub async fn update_analysis_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let Json(fields) =
        payload.map_err(|e| ApiError::bad_request(format!("Dados inválidos: {}", e.body_text())))?;

    let updated = state.deps.store.update(id, &fields).await.map_err(|e| {
        match e.downcast_ref::<UpdateError>() {
            Some(invalid) => ApiError::bad_request(invalid.to_string()),
            None => ApiError::Internal(e),
        }
    })?;

    if !updated {
        return Err(ApiError::not_found("Análise não encontrada"));
    }

    Ok(Json(json!({
        "success": true,
        "id": id,
        "updated_fields": fields.keys().collect::<Vec<_>>(),
    })))
}

pub async fn delete_analysis_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    if !state.deps.store.delete(id).await? {
        return Err(ApiError::not_found("Análise não encontrada"));
    }
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn stats_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    let deps = &state.deps;
    let database = match deps.store.stats().await {
        Ok(stats) => json!(stats),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load analysis stats");
            json!({ "error": e.to_string() })
        }
    };
    let health = system_health(deps).await;

    Json(json!({
        "database_stats": database,
        "ai_providers": deps.ai.provider_status(),
        "search_providers": deps.search.provider_status(),
        "system_health": health_label(health.healthy),
    }))
}
