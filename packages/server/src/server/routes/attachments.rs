//! POST /upload_attachment: multipart `file` plus optional `session_id`.

use axum::extract::{Extension, Multipart};
use axum::Json;
use serde_json::{json, Value};

use super::analyze::new_session_id;
use crate::kernel::Upload;
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub async fn upload_attachment_handler(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload: Option<Upload> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Formulário inválido: {}", e.body_text())))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Falha ao ler arquivo: {}", e.body_text()))
                })?;
                upload = Some(Upload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("session_id") => {
                let text = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Formulário inválido: {}", e.body_text()))
                })?;
                session_id = Some(text.trim().to_string()).filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("Nenhum arquivo enviado"))?;
    if upload.filename.trim().is_empty() {
        return Err(ApiError::bad_request("Nenhum arquivo selecionado"));
    }

    let session_id = session_id.unwrap_or_else(new_session_id);
    let summary = state
        .deps
        .attachments
        .process(&session_id, upload)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "session_id": session_id,
        "attachment": summary,
    })))
}
