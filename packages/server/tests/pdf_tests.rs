mod common;

use analyzer_core::common::PartialReport;
use analyzer_core::domains::reports::{build_document, preview, render_pdf};
use common::{fitness_request, generated_report};
use lopdf::Document;
use serde_json::Value;
use tokio_test::assert_ok;

const OPTIONAL_SECTIONS: usize = 13;

fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

fn all_page_text(bytes: &[u8]) -> Vec<u8> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .flat_map(|id| doc.get_page_content(*id).unwrap())
        .collect()
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn full_report_renders_every_section() {
    let report = PartialReport::from(&generated_report(&fitness_request()).await);

    let sections = build_document(&report);
    assert_eq!(sections.len(), OPTIONAL_SECTIONS + 2);

    let bytes = render_pdf(&report).unwrap();
    assert!(page_count(&bytes) >= sections.len());

    let text = all_page_text(&bytes);
    for heading in [
        "PESQUISA WEB MASSIVA",
        "DRIVERS MENTAIS CUSTOMIZADOS",
        "Driver 1: Rel",
        "Academia Tradicional",
        "INSIGHTS EXCLUSIVOS",
    ] {
        assert!(contains(&text, heading), "missing {}", heading);
    }
}

#[tokio::test]
async fn missing_keys_omit_exactly_those_sections() {
    let full = generated_report(&fitness_request()).await;
    let mut value = serde_json::to_value(&full).unwrap();
    let map = value.as_object_mut().unwrap();
    for key in [
        "avatar_ultra_detalhado",
        "pre_pitch_invisivel",
        "projecoes_cenarios",
    ] {
        map.remove(key);
    }

    let report = PartialReport::from_value(value).unwrap();
    let names: Vec<String> = preview(&report).sections;
    assert_eq!(names.len(), OPTIONAL_SECTIONS - 3);
    assert!(!names.iter().any(|n| n == "Avatar Ultra-Detalhado"));
    assert!(!names.iter().any(|n| n == "Pré-Pitch Invisível"));
    assert!(!names.iter().any(|n| n == "Projeções e Cenários"));

    let bytes = assert_ok!(render_pdf(&report));
    let text = all_page_text(&bytes);
    assert!(!contains(&text, "AVATAR ULTRA-DETALHADO"));
    assert!(contains(&text, "SISTEMA ANTI-OBJE"));
}

#[test]
fn malformed_sections_render_with_placeholders() {
    let report = PartialReport::from_value(serde_json::json!({
        "segmento": "Fintech",
        "drivers_mentais_customizados": {"nao": "é lista"},
        "metricas_performance_detalhadas": "texto solto",
        "insights_exclusivos": null
    }))
    .unwrap();

    let bytes = render_pdf(&report).unwrap();
    assert_eq!(page_count(&bytes), 2 + 2);
    assert!(contains(&all_page_text(&bytes), "N/A"));
}

#[test]
fn empty_object_renders_cover_and_summary() {
    let report = PartialReport::from_value(Value::Object(Default::default())).unwrap();
    let bytes = render_pdf(&report).unwrap();
    assert_eq!(page_count(&bytes), 2);
}
