//! POST /analyze: run the full pipeline for one request.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::common::{format_duration, AnalysisReport, AnalysisRequest, InputSummary};
use crate::kernel::ProgressSink;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `session_{unix seconds}_{8 hex chars}`.
pub fn new_session_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("session_{}_{}", Utc::now().timestamp(), suffix)
}

/// Parse and validate the body before any pipeline work happens.
pub(crate) fn parse_request(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisRequest, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::bad_request(format!("Dados inválidos: {}", e.body_text())))?;
    if !body.is_object() {
        return Err(ApiError::bad_request("Dados da requisição são obrigatórios"));
    }

    let request: AnalysisRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Dados inválidos: {}", e)))?;
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(request)
}

pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut request = parse_request(payload)?;
    let requested_at = Utc::now();

    let session_id = request
        .session_id()
        .map(str::to_string)
        .unwrap_or_else(new_session_id);
    request.session_id = Some(session_id.clone());
    request.attachments_context = state.deps.attachments.session_context(&session_id).await;

    info!(
        session_id = %session_id,
        segment = %request.segment(),
        with_attachments = request.attachments_context.is_some(),
        "Analysis requested"
    );

    let sink = state.deps.progress.sink(session_id.clone());
    let mut report = state
        .engine
        .generate(&request, Some(&sink as &dyn ProgressSink))
        .await;

    report.metadata.processing_time_formatted =
        Some(format_duration(report.metadata.processing_time_seconds));
    report.metadata.request_timestamp = Some(requested_at);
    report.metadata.session_id = Some(session_id.clone());
    report.metadata.input_data = Some(InputSummary {
        segment: request.segment().to_string(),
        product: request.product(),
        query: request.effective_query(),
    });

    match state.deps.store.create(&request, &report).await {
        Ok(id) => report.database_id = Some(id),
        Err(e) => warn!(session_id = %session_id, error = %e, "Failed to store analysis"),
    }

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_have_timestamp_and_hex_suffix() {
        let id = new_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
