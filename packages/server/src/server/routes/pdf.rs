//! PDF download, generation and preview.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::analyses::find_analysis;
use crate::common::PartialReport;
use crate::domains::reports::{download_filename, generated_filename, preview, render_pdf, PdfPreview};
use crate::server::app::AppState;
use crate::server::error::ApiError;

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn parse_report(payload: Result<Json<Value>, JsonRejection>) -> Result<PartialReport, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::bad_request(format!("Dados inválidos: {}", e.body_text())))?;
    if !body.is_object() {
        return Err(ApiError::bad_request("Dados da análise são obrigatórios"));
    }
    PartialReport::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Relatório inválido: {}", e)))
}

pub async fn download_pdf_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = find_analysis(&state, &id).await?;
    let report = PartialReport::from_value(record.report_value())
        .map_err(|e| ApiError::Internal(e.into()))?;

    let bytes = render_pdf(&report)?;
    info!(analysis_id = %record.id, bytes = bytes.len(), "PDF rendered for stored analysis");
    Ok(pdf_response(bytes, &download_filename(record.id)))
}

pub async fn generate_pdf_handler(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let report = parse_report(payload)?;
    let bytes = render_pdf(&report)?;
    info!(bytes = bytes.len(), "PDF rendered from posted report");
    Ok(pdf_response(bytes, &generated_filename(Utc::now())))
}

pub async fn pdf_preview_handler(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PdfPreview>, ApiError> {
    let report = parse_report(payload)?;
    Ok(Json(preview(&report)))
}
