//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::analysis::AnalysisEngine;
use crate::kernel::attachments::MAX_ATTACHMENT_BYTES;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    analyze_handler, delete_analysis_handler, download_pdf_handler, generate_pdf_handler,
    get_analysis_handler, health_handler, list_analyses_handler, pdf_preview_handler,
    progress_handler, progress_stream_handler, reset_providers_handler, stats_handler,
    status_handler, test_ai_handler, test_search_handler, update_analysis_handler,
    upload_attachment_handler,
};

/// Multipart framing on top of the largest accepted attachment.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub engine: Arc<AnalysisEngine>,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        let engine = Arc::new(AnalysisEngine::new(&deps));
        Self {
            deps: Arc::new(deps),
            engine,
        }
    }
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let state = AppState::new(deps);

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Analysis
        .route("/analyze", post(analyze_handler))
        .route(
            "/upload_attachment",
            post(upload_attachment_handler)
                .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        .route("/progress/:session_id", get(progress_handler))
        .route("/progress/:session_id/stream", get(progress_stream_handler))
        // Providers
        .route("/status", get(status_handler))
        .route("/reset_providers", post(reset_providers_handler))
        .route("/test_search", post(test_search_handler))
        .route("/test_ai", post(test_ai_handler))
        // Stored analyses
        .route("/list_analyses", get(list_analyses_handler))
        .route("/get_analysis/:id", get(get_analysis_handler))
        .route("/update_analysis/:id", patch(update_analysis_handler))
        .route("/delete_analysis/:id", delete(delete_analysis_handler))
        .route("/stats", get(stats_handler))
        // PDF
        .route("/api/download-pdf/:id", get(download_pdf_handler))
        .route("/generate_pdf", post(generate_pdf_handler))
        .route("/pdf_preview", post(pdf_preview_handler))
        // Health check
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
