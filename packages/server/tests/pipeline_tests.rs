mod common;

use analyzer_core::common::{AnalysisRequest, Text, EMERGENCY_STATUS, NA};
use analyzer_core::domains::analysis::stages::section_keys;
use analyzer_core::domains::analysis::AnalysisEngine;
use analyzer_core::kernel::test_dependencies::{MockAI, MockSearchService};
use analyzer_core::kernel::TestDependencies;
use common::{fitness_request, init_tracing, scripted_deps};
use serde_json::Value;

fn without_metadata(report: &impl serde::Serialize) -> Value {
    let mut value = serde_json::to_value(report).unwrap();
    if let Some(map) = value.as_object_mut() {
        map.remove("metadata");
    }
    value
}

#[tokio::test]
async fn every_section_is_present_when_all_stages_succeed() {
    init_tracing();
    let deps = scripted_deps();
    let engine = AnalysisEngine::new(&deps.into_deps());

    let report = engine.generate(&fitness_request(), None).await;
    let value = serde_json::to_value(&report).unwrap();
    for key in section_keys() {
        assert!(value.get(key).is_some(), "missing section {}", key);
    }

    assert!(!report.is_emergency());
    assert_eq!(report.avatar.persona_name, Some(Text::from("Carla Ativa")));
    assert_eq!(report.mental_drivers.len(), 1);
    assert_eq!(report.competition.direct_competitors.len(), 1);
    assert_eq!(report.web_research.total_queries, 10);
    assert_eq!(report.web_research.unique_sources.len(), 2);
    assert_eq!(deps.ai.call_count(), 6);
}

#[tokio::test]
async fn price_drives_computed_sections() {
    let engine = AnalysisEngine::new(&scripted_deps().into_deps());

    let report = engine.generate(&fitness_request(), None).await;
    let conservative = &report.metrics.financial_scenarios.conservative;
    assert_eq!(conservative.average_ticket, "R$ 497.00");
    assert_eq!(conservative.monthly_revenue, "R$ 4970.00");
}

#[tokio::test]
async fn non_json_answers_degrade_to_fallbacks_and_run_completes() {
    let ai = MockAI::new()
        .with_response("Desculpe, não consigo ajudar com isso.")
        .with_error("rate limited");
    let deps = TestDependencies::new().mock_ai(ai);
    let engine = AnalysisEngine::new(&deps.into_deps());

    let report = engine.generate(&AnalysisRequest::new("Pet Shop"), None).await;

    assert!(!report.is_emergency());
    assert!(report.avatar.persona_name.is_some());
    assert!(!report.mental_drivers.is_empty());
    assert!(!report.visual_proofs.is_empty());
    assert!(!report.insights.is_empty());
}

#[tokio::test]
async fn off_type_fields_do_not_discard_the_llm_answer() {
    let ai = MockAI::new()
        .with_json_response(&serde_json::json!({
            "nome_ficticio": "Ana Maratonista",
            "desejos_motivacoes": {"sonhos_profundos": null},
            "comportamento": {"medos_paralisantes": [{"medo": "Lesão"}]}
        }))
        .with_json_response(&serde_json::json!([
            {"nome": "Relógio Biológico", "frases_ancoragem": "O corpo não espera"},
            "texto solto"
        ]));
    let deps = TestDependencies::new().mock_ai(ai);
    let engine = AnalysisEngine::new(&deps.into_deps());

    let report = engine.generate(&AnalysisRequest::new("Corrida"), None).await;

    assert_eq!(report.avatar.persona_name, Some(Text::from("Ana Maratonista")));
    let fears = &report.avatar.behavior.as_ref().unwrap().fears;
    assert_eq!(fears[0].to_string(), "Medo: Lesão");

    assert_eq!(report.mental_drivers.len(), 1);
    assert_eq!(
        report.mental_drivers[0].anchor_phrases,
        vec![Text::from("O corpo não espera")]
    );
}

#[tokio::test]
async fn search_outage_leaves_research_empty_but_not_fatal() {
    let deps = TestDependencies::new().mock_search(MockSearchService::new().failing());
    let engine = AnalysisEngine::new(&deps.into_deps());

    let report = engine.generate(&AnalysisRequest::new("Turismo"), None).await;

    assert!(!report.is_emergency());
    assert_eq!(report.web_research.total_results, 0);
    assert_eq!(report.web_research.executed_queries.len(), 10);
    assert_eq!(deps.search.queries().len(), 10);
}

#[tokio::test]
async fn invalid_price_returns_emergency_report_with_all_sections() {
    let deps = TestDependencies::new();
    let engine = AnalysisEngine::new(&deps.into_deps());
    let mut request = AnalysisRequest::new("Moda");
    request.price = Some(Text::from("a combinar"));

    let report = engine.generate(&request, None).await;

    assert!(report.is_emergency());
    assert_eq!(report.status.as_deref(), Some(EMERGENCY_STATUS));
    assert_eq!(report.metadata.quality_score, 0.0);
    let value = serde_json::to_value(&report).unwrap();
    for key in section_keys() {
        assert!(value.get(key).is_some(), "missing section {}", key);
    }
}

#[tokio::test]
async fn identical_inputs_give_identical_reports() {
    let first = AnalysisEngine::new(&scripted_deps().into_deps())
        .generate(&fitness_request(), None)
        .await;
    let second = AnalysisEngine::new(&scripted_deps().into_deps())
        .generate(&fitness_request(), None)
        .await;

    assert_eq!(without_metadata(&first), without_metadata(&second));
}

#[tokio::test]
async fn missing_fields_stay_absent_rather_than_placeholder() {
    let engine = AnalysisEngine::new(&scripted_deps().into_deps());
    let report = engine.generate(&AnalysisRequest::new("Fitness"), None).await;

    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("produto").is_none());
    assert_ne!(value["segmento"], NA);
}
