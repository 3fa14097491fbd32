mod common;

use analyzer_core::domains::analysis::stages::section_keys;
use analyzer_core::kernel::test_dependencies::{
    search_result, MockAI, MockAnalysisStore, MockSearchService,
};
use analyzer_core::kernel::{BaseAnalysisStore, TestDependencies};
use axum::http::{header, Method, StatusCode};
use common::{fitness_request, generated_report, scripted_deps, TestApp};
use serde_json::json;

async fn app_with_stored(count: usize) -> TestApp {
    let app = TestApp::new(TestDependencies::new());
    let request = fitness_request();
    let report = generated_report(&request).await;
    for _ in 0..count {
        app.deps.store.create(&request, &report).await.unwrap();
    }
    app
}

// =============================================================================
// POST /analyze
// =============================================================================

#[tokio::test]
async fn analyze_without_segment_is_rejected_before_the_pipeline() {
    let app = TestApp::new(TestDependencies::new());

    let response = app.post_json("/analyze", json!({"produto": "Curso"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Segmento é obrigatório");

    let blank = app.post_json("/analyze", json!({"segmento": "  "})).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.deps.ai.call_count(), 0);
    assert!(app.deps.search.queries().is_empty());
    assert!(app.deps.store.is_empty());
}

#[tokio::test]
async fn analyze_without_body_is_rejected() {
    let app = TestApp::new(TestDependencies::new());

    let response = app.request(Method::POST, "/analyze", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
    assert_eq!(app.deps.ai.call_count(), 0);
}

#[tokio::test]
async fn analyze_returns_full_report_and_persists_it() {
    let app = TestApp::new(scripted_deps());

    let response = app
        .post_json(
            "/analyze",
            json!({"segmento": "Fitness", "produto": "Consultoria online", "preco": 497}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    for key in section_keys() {
        assert!(body.get(key).is_some(), "missing section {}", key);
    }
    assert_eq!(body["avatar_ultra_detalhado"]["nome_ficticio"], "Carla Ativa");

    let records = app.deps.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(body["database_id"], json!(records[0].id));

    let metadata = &body["metadata"];
    let session_id = metadata["session_id"].as_str().unwrap();
    assert!(session_id.starts_with("session_"));
    assert!(metadata["processing_time_formatted"].as_str().unwrap().ends_with('s'));
    assert_eq!(metadata["input_data"]["segmento"], "Fitness");

    let progress = app.get(&format!("/progress/{}", session_id)).await;
    assert_eq!(progress.status, StatusCode::OK);
    assert_eq!(progress.json()["completed"], true);
}

#[tokio::test]
async fn analyze_without_database_still_returns_report() {
    let app = TestApp::new(scripted_deps().mock_store(MockAnalysisStore::new().failing_writes()));

    let response = app.post_json("/analyze", json!({"segmento": "Fitness"})).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert!(body.get("database_id").is_none());
    assert!(body.get("insights_exclusivos").is_some());
}

#[tokio::test]
async fn analyze_appends_session_attachments_to_notes() {
    let app = TestApp::new(TestDependencies::new());

    let upload = app
        .upload("metas.txt", "text/plain", "Meta: 300 alunas no primeiro ano", Some("sessao-42"))
        .await;
    assert_eq!(upload.status, StatusCode::OK);

    let response = app
        .post_json("/analyze", json!({"segmento": "Fitness", "session_id": "sessao-42"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["metadata"]["session_id"], "sessao-42");
    assert!(app.deps.ai.was_called_with("300 alunas no primeiro ano"));
}

// =============================================================================
// Providers
// =============================================================================

#[tokio::test]
async fn status_is_healthy_when_every_dependency_is_available() {
    let app = TestApp::new(TestDependencies::new());

    let body = app.get("/status").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["ai_providers"][0]["name"], "mock-ai");
}

#[tokio::test]
async fn status_is_degraded_without_search_or_database() {
    let no_search =
        TestApp::new(TestDependencies::new().mock_search(MockSearchService::new().unavailable()));
    assert_eq!(no_search.get("/status").await.json()["status"], "degraded");

    let offline =
        TestApp::new(TestDependencies::new().mock_store(MockAnalysisStore::new().offline()));
    let body = offline.get("/status").await.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"]["status"], "error");
}

#[tokio::test]
async fn reset_providers_targets_the_requested_type() {
    let app = TestApp::new(TestDependencies::new());

    let response = app
        .post_json("/reset_providers", json!({"type": "ai", "provider": "openai"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.deps.ai.resets(), vec![Some("openai".to_string())]);

    let invalid = app.post_json("/reset_providers", json!({"type": "cache"})).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_caps_result_count() {
    let results = (0..20)
        .map(|i| search_result(&format!("https://exemplo.com/{}", i)))
        .collect();
    let app = TestApp::new(
        TestDependencies::new().mock_search(MockSearchService::new().with_default_results(results)),
    );

    let body = app
        .post_json("/test_search", json!({"query": "moda praia", "max_results": 50}))
        .await
        .json();
    assert_eq!(body["total"], 10);
    assert_eq!(app.deps.search.queries(), vec!["moda praia".to_string()]);
    assert_eq!(app.deps.search.max_results(), vec![10]);
}

#[tokio::test]
async fn test_ai_uses_small_token_ceiling() {
    let app = TestApp::new(TestDependencies::new().mock_ai(MockAI::new().with_response("OK")));

    let body = app.post_json("/test_ai", json!({"prompt": "Diga OK"})).await.json();
    assert_eq!(body["response"], "OK");
    assert_eq!(app.deps.ai.token_limits(), vec![500]);
}

#[tokio::test]
async fn test_ai_reports_provider_failure() {
    let app = TestApp::new(
        TestDependencies::new().mock_ai(MockAI::new().with_error("all providers failed")),
    );

    let response = app.post_json("/test_ai", json!({})).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Attachments
// =============================================================================

#[tokio::test]
async fn upload_returns_attachment_summary() {
    let app = TestApp::new(TestDependencies::new());

    let response = app
        .upload("vendas.csv", "text/csv", "mes,valor\njan,100", Some("s1"))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["session_id"], "s1");
    assert_eq!(body["attachment"]["filename"], "vendas.csv");
    assert_eq!(body["attachment"]["content_type"], "text/csv");
}

#[tokio::test]
async fn upload_without_filename_is_rejected() {
    let app = TestApp::new(TestDependencies::new());

    let response = app.upload("", "text/plain", "conteúdo", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_of_unsupported_type_is_rejected() {
    let app = TestApp::new(TestDependencies::new());

    let response = app
        .upload("foto.png", "image/png", "not really a png", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Stored analyses
// =============================================================================

#[tokio::test]
async fn list_analyses_defaults_to_twenty_and_caps_at_one_hundred() {
    let app = app_with_stored(25).await;

    let body = app.get("/list_analyses").await.json();
    assert_eq!(body["count"], 20);
    assert_eq!(body["limit"], 20);

    let body = app.get("/list_analyses?limit=500&offset=10").await.json();
    assert_eq!(body["limit"], 100);
    assert_eq!(body["count"], 15);
}

#[tokio::test]
async fn get_analysis_distinguishes_missing_and_malformed_ids() {
    let app = app_with_stored(1).await;
    let id = app.deps.store.records()[0].id;

    let found = app.get(&format!("/get_analysis/{}", id)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json()["segment"], "Fitness");

    let missing = app
        .get("/get_analysis/018f4c2e-7a7e-7cc0-9d55-3f2a1b0c9d8e")
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.get("/get_analysis/nao-e-uuid").await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_analysis_accepts_only_known_columns() {
    let app = app_with_stored(1).await;
    let id = app.deps.store.records()[0].id;
    let uri = format!("/update_analysis/{}", id);

    let response = app
        .request(
            Method::PATCH,
            &uri,
            Some(json!({"status": "reviewed", "price": "1.997,00"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let record = &app.deps.store.records()[0];
    assert_eq!(record.status, "reviewed");
    assert_eq!(record.price, Some(1997.0));

    let unknown = app
        .request(Method::PATCH, &uri, Some(json!({"id": "outro"})))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let null_status = app
        .request(Method::PATCH, &uri, Some(json!({"status": null})))
        .await;
    assert_eq!(null_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.deps.store.records()[0].status, "reviewed");

    let missing = app
        .request(
            Method::PATCH,
            "/update_analysis/018f4c2e-7a7e-7cc0-9d55-3f2a1b0c9d8e",
            Some(json!({"status": "x"})),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_analysis_removes_the_row() {
    let app = app_with_stored(1).await;
    let id = app.deps.store.records()[0].id;
    let uri = format!("/delete_analysis/{}", id);

    assert_eq!(app.request(Method::DELETE, &uri, None).await.status, StatusCode::OK);
    assert!(app.deps.store.is_empty());
    assert_eq!(
        app.request(Method::DELETE, &uri, None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn stats_combine_database_and_providers() {
    let app = app_with_stored(3).await;

    let body = app.get("/stats").await.json();
    assert_eq!(body["database_stats"]["total_analyses"], 3);
    assert_eq!(body["database_stats"]["status_counts"]["completed"], 3);
    assert_eq!(body["system_health"], "healthy");
}

// =============================================================================
// PDF
// =============================================================================

#[tokio::test]
async fn download_pdf_renders_stored_analysis() {
    let app = app_with_stored(1).await;
    let id = app.deps.store.records()[0].id;

    let response = app.get(&format!("/api/download-pdf/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), Some("application/pdf"));
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some(format!("attachment; filename=\"relatorio_analise_{}.pdf\"", id).as_str())
    );
    assert!(response.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn generate_pdf_accepts_partial_reports() {
    let app = TestApp::new(TestDependencies::new());

    let response = app
        .post_json(
            "/generate_pdf",
            json!({"segmento": "Moda", "insights_exclusivos": ["Nicho sustentável em alta"]}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let disposition = response.header(header::CONTENT_DISPOSITION).unwrap();
    assert!(disposition.contains("analise_mercado_"));
    assert!(response.bytes.starts_with(b"%PDF"));

    let invalid = app.post_json("/generate_pdf", json!(["não", "é", "relatório"])).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pdf_preview_lists_present_sections() {
    let app = TestApp::new(TestDependencies::new());

    let body = app
        .post_json(
            "/pdf_preview",
            json!({"segmento": "Moda", "escopo": {}, "projecoes_cenarios": {}}),
        )
        .await
        .json();
    assert_eq!(
        body["sections"],
        json!(["Escopo e Posicionamento", "Projeções e Cenários"])
    );
    assert_eq!(body["estimated_pages"], 4);
    assert_eq!(body["file_size_estimate"], "200KB");
}

// =============================================================================
// Progress and health
// =============================================================================

#[tokio::test]
async fn progress_for_unknown_session_is_not_found() {
    let app = TestApp::new(TestDependencies::new());
    assert_eq!(
        app.get("/progress/desconhecida").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn health_reflects_database_liveness() {
    let app = TestApp::new(TestDependencies::new());
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");

    let offline =
        TestApp::new(TestDependencies::new().mock_store(MockAnalysisStore::new().offline()));
    assert_eq!(
        offline.get("/health").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}
