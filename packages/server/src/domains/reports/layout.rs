//! Report → document blocks.
//!
//! Layout is independent of the PDF encoding: each section becomes a list of
//! [`Block`]s which the renderer wraps and paginates. Absent report keys
//! produce no section; missing fields inside a present section render as
//! `N/A`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{
    display_value, humanize_key, ActionPlan, AntiObjection, Avatar, Competition, KeywordStrategy,
    MentalDriver, OrNa, PartialReport, PerformanceMetrics, Positioning, PrePitch, Projections,
    Text, VisualProof, WebResearch, NA,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Subheading(String),
    Paragraph(String),
    /// Bold label followed by a regular value.
    Field { label: String, value: String },
    Bullet(String),
    Spacer,
}

/// One section of the document. Every section starts on a new page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSection {
    pub name: &'static str,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfPreview {
    pub sections: Vec<String>,
    pub estimated_pages: usize,
    pub file_size_estimate: String,
    pub generation_time_estimate: String,
}

pub const COVER_TITLE: &str = "ANÁLISE ULTRA-DETALHADA DE MERCADO";
pub const SUMMARY_TITLE: &str = "SUMÁRIO EXECUTIVO";
const SUMMARY_INSIGHTS: usize = 5;
const MAX_QUERIES_LISTED: usize = 10;
const MAX_SECONDARY_KEYWORDS: usize = 15;
const MAX_LONG_TAIL_KEYWORDS: usize = 10;

fn field(label: &str, value: impl Into<String>) -> Block {
    Block::Field {
        label: label.to_string(),
        value: value.into(),
    }
}

fn heading(text: &str) -> Block {
    Block::Heading(text.to_string())
}

fn bullets<'a, I, T>(items: I) -> impl Iterator<Item = Block> + 'a
where
    I: IntoIterator<Item = &'a T> + 'a,
    T: std::fmt::Display + 'a,
{
    items.into_iter().map(|item| Block::Bullet(item.to_string()))
}

fn join<T: std::fmt::Display>(items: &[T], limit: usize) -> String {
    if items.is_empty() {
        return NA.to_string();
    }
    items
        .iter()
        .take(limit)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"R$ 997"` for a present value, `N/A` otherwise.
fn currency(value: &Option<Text>) -> String {
    match value {
        Some(v) if !v.is_blank() => format!("R$ {}", v),
        _ => NA.to_string(),
    }
}

/// `12345` → `"12.345"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn metadata_str<'a>(metadata: &'a Option<Value>, key: &str) -> Option<&'a str> {
    metadata.as_ref()?.get(key)?.as_str()
}

// =============================================================================
// Cover and summary
// =============================================================================

fn cover(report: &PartialReport) -> DocumentSection {
    let mut blocks = vec![
        Block::Title(COVER_TITLE.to_string()),
        Block::Spacer,
        Block::Subtitle(format!("Segmento: {}", report.segment.or_na())),
    ];
    if let Some(product) = report.product.as_ref().filter(|p| !p.is_blank()) {
        blocks.push(Block::Subtitle(format!("Produto: {}", product)));
    }
    blocks.push(Block::Spacer);

    let generated = metadata_str(&report.metadata, "generated_at")
        .map(|g| g.chars().take(10).collect::<String>());
    let processing = metadata_str(&report.metadata, "processing_time_formatted")
        .map(str::to_string)
        .or_else(|| {
            report
                .metadata
                .as_ref()
                .and_then(|m| m.get("processing_time_seconds"))
                .and_then(Value::as_f64)
                .map(|s| format!("{:.1} segundos", s))
        });

    blocks.push(field("Data de Geração", generated.or_na()));
    blocks.push(field(
        "Motor de Análise",
        metadata_str(&report.metadata, "analysis_engine").or_na(),
    ));
    blocks.push(field("Tempo de Processamento", processing.or_na()));

    DocumentSection {
        name: "Capa",
        blocks,
    }
}

fn summary(report: &PartialReport) -> DocumentSection {
    let mut blocks = vec![
        Block::Title(SUMMARY_TITLE.to_string()),
        Block::Spacer,
        Block::Bullet(format!("Segmento analisado: {}", report.segment.or_na())),
        Block::Bullet(format!("Público-alvo: {}", report.audience.or_na())),
        Block::Bullet(format!("Preço: {}", currency(&report.price))),
        Block::Bullet(format!(
            "Objetivo de receita: {}",
            currency(&report.revenue_goal)
        )),
    ];

    if let Some(insights) = report.insights.as_ref().filter(|i| !i.is_empty()) {
        blocks.push(Block::Spacer);
        blocks.push(heading("Principais Insights"));
        blocks.extend(bullets(insights.iter().take(SUMMARY_INSIGHTS)));
    }

    DocumentSection {
        name: "Sumário Executivo",
        blocks,
    }
}

// =============================================================================
// Section bodies
// =============================================================================

fn research_blocks(research: &WebResearch) -> Vec<Block> {
    let mut blocks = vec![
        heading("Estatísticas da Pesquisa"),
        field("Total de Queries", research.total_queries.to_string()),
        field("Total de Resultados", research.total_results.to_string()),
        field(
            "Conteúdo Extraído",
            format!("{} caracteres", group_thousands(research.extracted_chars)),
        ),
        field("Fontes Únicas", research.unique_sources.len().to_string()),
    ];
    if !research.executed_queries.is_empty() {
        blocks.push(heading("Queries Executadas"));
        blocks.extend(bullets(
            research.executed_queries.iter().take(MAX_QUERIES_LISTED),
        ));
    }
    blocks
}

fn avatar_blocks(avatar: &Avatar) -> Vec<Block> {
    let mut blocks = vec![field("Nome Fictício", avatar.persona_name.or_na())];

    if let Some(demo) = &avatar.demographics {
        blocks.push(heading("Perfil Demográfico"));
        blocks.push(field("Idade", demo.age.or_na()));
        blocks.push(field("Gênero", demo.gender.or_na()));
        blocks.push(field("Renda", demo.income.or_na()));
        blocks.push(field("Escolaridade", demo.education.or_na()));
        blocks.push(field("Localização", demo.location.or_na()));
    }

    if let Some(psycho) = avatar.psychographics.as_ref().filter(|p| !p.is_empty()) {
        blocks.push(heading("Perfil Psicográfico"));
        for (key, value) in psycho {
            blocks.push(field(&humanize_key(key), display_value(value)));
        }
    }

    if let Some(pains) = avatar.pains.as_ref().filter(|p| !p.top_pains.is_empty()) {
        blocks.push(heading("Dores Específicas"));
        for pain in &pains.top_pains {
            blocks.push(Block::Bullet(format!(
                "{} ({}): {}",
                pain.pain.or_na(),
                pain.frequency.or_na(),
                pain.context.or_na()
            )));
        }
    }

    if let Some(desires) = avatar.desires.as_ref().filter(|d| !d.deep_dreams.is_empty()) {
        blocks.push(heading("Desejos Profundos"));
        blocks.extend(bullets(&desires.deep_dreams));
    }

    if let Some(behavior) = &avatar.behavior {
        if !behavior.archetypes.is_empty() {
            blocks.push(heading("Arquétipos Dominantes"));
            for (key, archetype) in &behavior.archetypes {
                blocks.push(Block::Bullet(format!(
                    "{} ({}): {}",
                    humanize_key(key),
                    archetype.share.or_na(),
                    archetype.description.or_na()
                )));
            }
        }
        if !behavior.fears.is_empty() {
            blocks.push(heading("Medos Paralisantes"));
            blocks.extend(bullets(&behavior.fears));
        }
    }

    blocks
}

fn drivers_blocks(drivers: &[MentalDriver]) -> Vec<Block> {
    if drivers.is_empty() {
        return vec![Block::Paragraph(NA.to_string())];
    }

    let mut blocks = Vec::new();
    for (i, driver) in drivers.iter().enumerate() {
        let name = match &driver.name {
            Some(name) if !name.is_blank() => name.to_string(),
            _ => "Driver Mental".to_string(),
        };
        blocks.push(Block::Subheading(format!("Driver {}: {}", i + 1, name)));
        blocks.push(field("Gatilho Central", driver.trigger.or_na()));
        blocks.push(field("Definição", driver.definition.or_na()));

        if let Some(script) = &driver.activation {
            blocks.push(Block::Paragraph("Roteiro de Ativação:".to_string()));
            blocks.push(Block::Bullet(format!(
                "Pergunta: {}",
                script.opening_question.or_na()
            )));
            blocks.push(Block::Bullet(format!("História: {}", script.story.or_na())));
            blocks.push(Block::Bullet(format!(
                "Comando: {}",
                script.call_to_action.or_na()
            )));
        }

        if !driver.anchor_phrases.is_empty() {
            blocks.push(Block::Paragraph("Frases de Ancoragem:".to_string()));
            for phrase in &driver.anchor_phrases {
                blocks.push(Block::Bullet(format!("\"{}\"", phrase)));
            }
        }
        blocks.push(Block::Spacer);
    }
    blocks
}

fn anti_objection_blocks(system: &AntiObjection) -> Vec<Block> {
    let mut blocks = Vec::new();

    if !system.universal.is_empty() {
        blocks.push(heading("Objeções Universais"));
        for (kind, objection) in &system.universal {
            blocks.push(Block::Subheading(humanize_key(kind)));
            blocks.push(Block::Bullet(format!(
                "Objeção: {}",
                objection.objection.or_na()
            )));
            blocks.push(Block::Bullet(format!(
                "Contra-ataque: {}",
                objection.counter.or_na()
            )));
        }
    }

    if !system.hidden.is_empty() {
        blocks.push(heading("Objeções Ocultas"));
        for (kind, objection) in &system.hidden {
            blocks.push(Block::Subheading(humanize_key(kind)));
            blocks.push(Block::Bullet(format!(
                "Perfil: {}",
                objection.typical_profile.or_na()
            )));
            blocks.push(Block::Bullet(format!(
                "Contra-ataque: {}",
                objection.counter.or_na()
            )));
        }
    }

    if !system.emergency_arsenal.is_empty() {
        blocks.push(heading("Arsenal de Emergência"));
        blocks.extend(bullets(&system.emergency_arsenal));
    }

    if blocks.is_empty() {
        blocks.push(Block::Paragraph(NA.to_string()));
    }
    blocks
}

fn visual_proofs_blocks(proofs: &[VisualProof]) -> Vec<Block> {
    if proofs.is_empty() {
        return vec![Block::Paragraph(NA.to_string())];
    }

    let mut blocks = Vec::new();
    for (i, proof) in proofs.iter().enumerate() {
        let name = match &proof.name {
            Some(name) if !name.is_blank() => name.to_string(),
            _ => "Prova Visual".to_string(),
        };
        blocks.push(Block::Subheading(format!("PROVI {}: {}", i + 1, name)));
        blocks.push(field("Conceito Alvo", proof.target_concept.or_na()));
        blocks.push(field("Experimento", proof.experiment.or_na()));
        if proof.analogy.is_some() {
            blocks.push(field("Analogia", proof.analogy.or_na()));
        }
        if !proof.materials.is_empty() {
            blocks.push(Block::Paragraph("Materiais:".to_string()));
            blocks.extend(bullets(&proof.materials));
        }
        blocks.push(Block::Spacer);
    }
    blocks
}

fn pre_pitch_blocks(pre_pitch: &PrePitch) -> Vec<Block> {
    let mut blocks = Vec::new();

    if let Some(orchestration) = &pre_pitch.orchestration {
        blocks.push(heading("Orquestração Emocional"));
        for phase in &orchestration.sequence {
            let name = match &phase.phase {
                Some(p) if !p.is_blank() => p.to_string(),
                _ => "Fase".to_string(),
            };
            blocks.push(field(&name, phase.goal.or_na()));
            blocks.push(Block::Bullet(format!("Tempo: {}", phase.duration.or_na())));
            if !phase.techniques.is_empty() {
                blocks.push(Block::Bullet(format!(
                    "Técnicas: {}",
                    join(&phase.techniques, usize::MAX)
                )));
            }
        }
    }

    if let Some(script) = &pre_pitch.script {
        blocks.push(heading("Roteiro Completo"));
        for (label, part) in [("Abertura", &script.opening), ("Fechamento", &script.closing)] {
            if let Some(part) = part {
                blocks.push(Block::Paragraph(format!(
                    "{} ({}):",
                    label,
                    part.duration.or_na()
                )));
                blocks.push(Block::Bullet(part.script.or_na()));
            }
        }
    }

    if blocks.is_empty() {
        blocks.push(Block::Paragraph(NA.to_string()));
    }
    blocks
}

fn positioning_blocks(positioning: &Positioning) -> Vec<Block> {
    let mut blocks = Vec::new();
    for (title, text) in [
        ("Posicionamento no Mercado", &positioning.market_positioning),
        ("Proposta de Valor", &positioning.value_proposition),
        ("Mensagem Central", &positioning.core_message),
    ] {
        blocks.push(heading(title));
        blocks.push(Block::Paragraph(text.or_na()));
    }
    if !positioning.differentiators.is_empty() {
        blocks.push(heading("Diferenciais Competitivos"));
        blocks.extend(bullets(&positioning.differentiators));
    }
    blocks
}

fn competition_blocks(competition: &Competition) -> Vec<Block> {
    let mut blocks = Vec::new();

    if !competition.direct_competitors.is_empty() {
        blocks.push(heading("Concorrentes Diretos"));
        for (i, competitor) in competition.direct_competitors.iter().enumerate() {
            let name = match &competitor.name {
                Some(n) if !n.is_blank() => n.to_string(),
                _ => format!("Concorrente {}", i + 1),
            };
            blocks.push(Block::Subheading(name));
            if let Some(swot) = &competitor.swot {
                if !swot.strengths.is_empty() {
                    blocks.push(Block::Paragraph("Pontos Fortes:".to_string()));
                    blocks.extend(bullets(&swot.strengths));
                }
                if !swot.weaknesses.is_empty() {
                    blocks.push(Block::Paragraph("Pontos Fracos:".to_string()));
                    blocks.extend(bullets(&swot.weaknesses));
                }
            }
            if competitor.positioning.is_some() {
                blocks.push(field("Posicionamento", competitor.positioning.or_na()));
            }
        }
    }

    if !competition.opportunity_gaps.is_empty() {
        blocks.push(heading("Oportunidades Identificadas"));
        blocks.extend(bullets(&competition.opportunity_gaps));
    }

    if blocks.is_empty() {
        blocks.push(Block::Paragraph(NA.to_string()));
    }
    blocks
}

fn keyword_blocks(keywords: &KeywordStrategy) -> Vec<Block> {
    vec![
        heading("Palavras-Chave Primárias"),
        Block::Paragraph(join(&keywords.primary, usize::MAX)),
        heading("Palavras-Chave Secundárias"),
        Block::Paragraph(join(&keywords.secondary, MAX_SECONDARY_KEYWORDS)),
        heading("Palavras-Chave Long Tail"),
        Block::Paragraph(join(&keywords.long_tail, MAX_LONG_TAIL_KEYWORDS)),
        heading("Estratégia de Conteúdo"),
        Block::Paragraph(keywords.content_strategy.or_na()),
    ]
}

fn metrics_blocks(metrics: &PerformanceMetrics) -> Vec<Block> {
    let mut blocks = vec![heading("KPIs Principais")];
    if metrics.kpis.is_empty() {
        blocks.push(Block::Paragraph(NA.to_string()));
    }
    for kpi in &metrics.kpis {
        blocks.push(field(&kpi.metric.or_na(), kpi.target.or_na()));
    }

    blocks.push(heading("Cenários Financeiros"));
    let scenarios = &metrics.financial_scenarios;
    for (label, scenario) in [
        ("Conservador", &scenarios.conservative),
        ("Realista", &scenarios.realistic),
        ("Otimista", &scenarios.optimistic),
    ] {
        blocks.push(field(
            label,
            format!(
                "receita mensal {}, {} clientes/mês, ticket {}, margem {}",
                scenario.monthly_revenue.or_na(),
                scenario.customers_per_month.or_na(),
                scenario.average_ticket.or_na(),
                scenario.profit_margin.or_na()
            ),
        ));
    }

    blocks.push(heading("ROI Esperado"));
    blocks.push(Block::Paragraph(metrics.expected_roi.or_na()));
    blocks.push(field("Payback", metrics.payback.or_na()));
    blocks.push(field("Lifetime Value", metrics.lifetime_value.or_na()));
    blocks
}

fn projections_blocks(projections: &Projections) -> Vec<Block> {
    let mut blocks = vec![field("Horizonte", projections.horizon.or_na())];

    let scenarios = &projections.scenarios;
    for (label, scenario) in [
        ("Conservador", &scenarios.conservative),
        ("Realista", &scenarios.realistic),
        ("Otimista", &scenarios.optimistic),
    ] {
        blocks.push(Block::Subheading(label.to_string()));
        blocks.push(Block::Bullet(format!(
            "Probabilidade: {}",
            scenario.probability.or_na()
        )));
        blocks.push(Block::Bullet(format!(
            "Crescimento anual: {}",
            scenario.annual_growth.or_na()
        )));
        blocks.push(Block::Bullet(format!(
            "Receita ano 1: {}",
            scenario.revenue_year_1.or_na()
        )));
        blocks.push(Block::Bullet(format!(
            "Receita ano 2: {}",
            scenario.revenue_year_2.or_na()
        )));
        blocks.push(Block::Bullet(format!(
            "Receita ano 3: {}",
            scenario.revenue_year_3.or_na()
        )));
    }

    if !projections.critical_factors.is_empty() {
        blocks.push(heading("Fatores Críticos"));
        blocks.extend(bullets(&projections.critical_factors));
    }
    if !projections.milestones.is_empty() {
        blocks.push(heading("Marcos Importantes"));
        for (month, goal) in &projections.milestones {
            blocks.push(field(&humanize_key(month), goal.or_na()));
        }
    }
    blocks
}

fn action_plan_blocks(plan: &ActionPlan) -> Vec<Block> {
    let mut blocks = Vec::new();
    for (title, phase) in plan.phases() {
        blocks.push(heading(title));
        blocks.push(field("Duração", phase.duration.or_na()));
        blocks.push(field("Foco", phase.focus.or_na()));
        blocks.push(field("Investimento", phase.investment.or_na()));
        if !phase.activities.is_empty() {
            blocks.push(Block::Paragraph("Atividades:".to_string()));
            blocks.extend(bullets(&phase.activities));
        }
        if !phase.deliverables.is_empty() {
            blocks.push(Block::Paragraph("Entregas:".to_string()));
            blocks.extend(bullets(&phase.deliverables));
        }
        blocks.push(Block::Spacer);
    }
    blocks
}

fn insights_blocks(insights: &[String]) -> Vec<Block> {
    if insights.is_empty() {
        return vec![Block::Paragraph(NA.to_string())];
    }
    insights
        .iter()
        .enumerate()
        .map(|(i, insight)| Block::Paragraph(format!("{}. {}", i + 1, insight)))
        .collect()
}

// =============================================================================
// Document assembly
// =============================================================================

fn titled(name: &'static str, title: &str, body: Vec<Block>) -> DocumentSection {
    let mut blocks = vec![Block::Title(title.to_string()), Block::Spacer];
    blocks.extend(body);
    DocumentSection { name, blocks }
}

/// Optional sections in document order, present only when the key is.
fn optional_sections(report: &PartialReport) -> Vec<DocumentSection> {
    let mut sections = Vec::new();

    if let Some(research) = &report.web_research {
        sections.push(titled(
            "Pesquisa Web Massiva",
            "PESQUISA WEB MASSIVA",
            research_blocks(research),
        ));
    }
    if let Some(avatar) = &report.avatar {
        sections.push(titled(
            "Avatar Ultra-Detalhado",
            "AVATAR ULTRA-DETALHADO",
            avatar_blocks(avatar),
        ));
    }
    if let Some(drivers) = &report.mental_drivers {
        sections.push(titled(
            "Drivers Mentais Customizados",
            "DRIVERS MENTAIS CUSTOMIZADOS",
            drivers_blocks(drivers),
        ));
    }
    if let Some(system) = &report.anti_objection {
        sections.push(titled(
            "Sistema Anti-Objeção",
            "SISTEMA ANTI-OBJEÇÃO",
            anti_objection_blocks(system),
        ));
    }
    if let Some(proofs) = &report.visual_proofs {
        sections.push(titled(
            "Provas Visuais Instantâneas",
            "PROVAS VISUAIS INSTANTÂNEAS",
            visual_proofs_blocks(proofs),
        ));
    }
    if let Some(pre_pitch) = &report.pre_pitch {
        sections.push(titled(
            "Pré-Pitch Invisível",
            "PRÉ-PITCH INVISÍVEL",
            pre_pitch_blocks(pre_pitch),
        ));
    }
    if let Some(positioning) = &report.positioning {
        sections.push(titled(
            "Escopo e Posicionamento",
            "ESCOPO E POSICIONAMENTO",
            positioning_blocks(positioning),
        ));
    }
    if let Some(competition) = &report.competition {
        sections.push(titled(
            "Análise de Concorrência",
            "ANÁLISE DE CONCORRÊNCIA",
            competition_blocks(competition),
        ));
    }
    if let Some(keywords) = &report.keywords {
        sections.push(titled(
            "Estratégia de Marketing",
            "ESTRATÉGIA DE MARKETING",
            keyword_blocks(keywords),
        ));
    }
    if let Some(metrics) = &report.metrics {
        sections.push(titled(
            "Métricas de Performance",
            "MÉTRICAS DE PERFORMANCE",
            metrics_blocks(metrics),
        ));
    }
    if let Some(projections) = &report.projections {
        sections.push(titled(
            "Projeções e Cenários",
            "PROJEÇÕES E CENÁRIOS",
            projections_blocks(projections),
        ));
    }
    if let Some(plan) = &report.action_plan {
        sections.push(titled(
            "Plano de Ação",
            "PLANO DE AÇÃO DETALHADO",
            action_plan_blocks(plan),
        ));
    }
    if let Some(insights) = &report.insights {
        sections.push(titled(
            "Insights Exclusivos",
            "INSIGHTS EXCLUSIVOS",
            insights_blocks(insights),
        ));
    }

    sections
}

/// Every section of the document: cover and summary first, then each
/// present report section.
pub fn build_document(report: &PartialReport) -> Vec<DocumentSection> {
    let mut sections = vec![cover(report), summary(report)];
    sections.extend(optional_sections(report));
    sections
}

pub fn preview(report: &PartialReport) -> PdfPreview {
    let sections: Vec<String> = optional_sections(report)
        .into_iter()
        .map(|s| s.name.to_string())
        .collect();
    let estimated_pages = sections.len() + 2;

    PdfPreview {
        sections,
        estimated_pages,
        file_size_estimate: format!("{}KB", estimated_pages * 50),
        generation_time_estimate: format!("{} segundos", estimated_pages * 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(sections: &[DocumentSection]) -> Vec<&'static str> {
        sections.iter().map(|s| s.name).collect()
    }

    #[test]
    fn empty_report_has_cover_and_summary_only() {
        let sections = build_document(&PartialReport::default());
        assert_eq!(names(&sections), ["Capa", "Sumário Executivo"]);
    }

    #[test]
    fn sections_follow_document_order() {
        let report = PartialReport::from_value(json!({
            "insights_exclusivos": ["a"],
            "escopo": {},
            "pesquisa_web_massiva": {},
            "drivers_mentais_customizados": []
        }))
        .unwrap();

        assert_eq!(
            names(&build_document(&report)),
            [
                "Capa",
                "Sumário Executivo",
                "Pesquisa Web Massiva",
                "Drivers Mentais Customizados",
                "Escopo e Posicionamento",
                "Insights Exclusivos"
            ]
        );
    }

    #[test]
    fn missing_fields_render_as_na() {
        let report = PartialReport::from_value(json!({
            "avatar_ultra_detalhado": {"perfil_demografico_detalhado": {"idade": "30-40"}}
        }))
        .unwrap();

        let avatar = &build_document(&report)[2];
        assert!(avatar.blocks.contains(&field("Idade", "30-40")));
        assert!(avatar.blocks.contains(&field("Renda", NA)));
        assert!(avatar.blocks.contains(&field("Nome Fictício", NA)));
    }

    #[test]
    fn summary_lists_first_five_insights() {
        let report = PartialReport::from_value(json!({
            "segmento": "Educação",
            "preco": 497,
            "insights_exclusivos": ["1", "2", "3", "4", "5", "6", "7"]
        }))
        .unwrap();

        let summary = &build_document(&report)[1];
        let bullets: Vec<&Block> = summary
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Bullet(_)))
            .collect();
        assert_eq!(bullets.len(), 4 + 5);
        assert!(summary
            .blocks
            .contains(&Block::Bullet("Preço: R$ 497".to_string())));
        assert!(summary
            .blocks
            .contains(&Block::Bullet("Objetivo de receita: N/A".to_string())));
    }

    #[test]
    fn preview_estimates_from_section_count() {
        let report = PartialReport::from_value(json!({
            "avatar_ultra_detalhado": {},
            "plano_acao_detalhado": {},
            "insights_exclusivos": []
        }))
        .unwrap();

        let preview = preview(&report);
        assert_eq!(
            preview.sections,
            ["Avatar Ultra-Detalhado", "Plano de Ação", "Insights Exclusivos"]
        );
        assert_eq!(preview.estimated_pages, 5);
        assert_eq!(preview.file_size_estimate, "250KB");
        assert_eq!(preview.generation_time_estimate, "10 segundos");
    }

    #[test]
    fn thousands_use_dot_separator() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(45_210), "45.210");
        assert_eq!(group_thousands(1_234_567), "1.234.567");
    }
}
