//! The analysis report and its sections.
//!
//! [`AnalysisReport`] is what the pipeline produces: every section present.
//! [`PartialReport`] is what the PDF renderer accepts: any section may be
//! missing, and a malformed field inside a section is defaulted on its own so
//! it renders as `N/A` while its siblings render normally.

mod computed;
mod lenient;
mod sections;

pub use computed::*;
pub use sections::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::entity_ids::AnalysisId;
use crate::common::text::Text;

pub const ANALYSIS_ENGINE: &str = "Market Analyzer Pipeline v2";
pub const QUALITY_SCORE: f64 = 99.9;
pub const EMERGENCY_QUALITY_SCORE: f64 = 0.0;
pub const EMERGENCY_STATUS: &str = "emergency_mode";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "segmento")]
    pub segment: String,
    #[serde(rename = "produto", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(rename = "publico", skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(rename = "preco", skip_serializing_if = "Option::is_none")]
    pub price: Option<Text>,
    #[serde(rename = "objetivo_receita", skip_serializing_if = "Option::is_none")]
    pub revenue_goal: Option<Text>,

    #[serde(rename = "pesquisa_web_massiva")]
    pub web_research: WebResearch,
    #[serde(rename = "avatar_ultra_detalhado")]
    pub avatar: Avatar,
    #[serde(rename = "drivers_mentais_customizados")]
    pub mental_drivers: Vec<MentalDriver>,
    #[serde(rename = "sistema_anti_objecao")]
    pub anti_objection: AntiObjection,
    #[serde(rename = "provas_visuais_sugeridas")]
    pub visual_proofs: Vec<VisualProof>,
    #[serde(rename = "pre_pitch_invisivel")]
    pub pre_pitch: PrePitch,
    #[serde(rename = "analise_concorrencia_detalhada")]
    pub competition: Competition,
    #[serde(rename = "escopo")]
    pub positioning: Positioning,
    #[serde(rename = "estrategia_palavras_chave")]
    pub keywords: KeywordStrategy,
    #[serde(rename = "metricas_performance_detalhadas")]
    pub metrics: PerformanceMetrics,
    #[serde(rename = "projecoes_cenarios")]
    pub projections: Projections,
    #[serde(rename = "plano_acao_detalhado")]
    pub action_plan: ActionPlan,
    #[serde(rename = "insights_exclusivos")]
    pub insights: Vec<String>,

    pub metadata: ReportMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<AnalysisId>,
}

impl AnalysisReport {
    pub fn is_emergency(&self) -> bool {
        self.status.as_deref() == Some(EMERGENCY_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub processing_time_seconds: f64,
    pub analysis_engine: String,
    pub generated_at: DateTime<Utc>,
    pub quality_score: f64,
    pub completeness_level: String,
    pub systems_implemented: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data: Option<InputSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    #[serde(rename = "segmento")]
    pub segment: String,
    #[serde(rename = "produto", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    pub query: String,
}

/// `"{m}m {s}s"` for a duration in seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}m {}s", total / 60, total % 60)
}

/// Report shape accepted by the PDF renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialReport {
    #[serde(rename = "segmento", default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<Text>,
    #[serde(rename = "produto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Text>,
    #[serde(rename = "publico", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Text>,
    #[serde(rename = "preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Text>,
    #[serde(rename = "objetivo_receita", default, skip_serializing_if = "Option::is_none")]
    pub revenue_goal: Option<Text>,

    #[serde(
        rename = "pesquisa_web_massiva",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub web_research: Option<WebResearch>,
    #[serde(
        rename = "avatar_ultra_detalhado",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<Avatar>,
    #[serde(
        rename = "drivers_mentais_customizados",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub mental_drivers: Option<Vec<MentalDriver>>,
    #[serde(
        rename = "sistema_anti_objecao",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub anti_objection: Option<AntiObjection>,
    #[serde(
        rename = "provas_visuais_sugeridas",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub visual_proofs: Option<Vec<VisualProof>>,
    #[serde(
        rename = "pre_pitch_invisivel",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub pre_pitch: Option<PrePitch>,
    #[serde(
        rename = "analise_concorrencia_detalhada",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub competition: Option<Competition>,
    #[serde(
        rename = "escopo",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub positioning: Option<Positioning>,
    #[serde(
        rename = "estrategia_palavras_chave",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub keywords: Option<KeywordStrategy>,
    #[serde(
        rename = "metricas_performance_detalhadas",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub metrics: Option<PerformanceMetrics>,
    #[serde(
        rename = "projecoes_cenarios",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub projections: Option<Projections>,
    #[serde(
        rename = "plano_acao_detalhado",
        default,
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub action_plan: Option<ActionPlan>,
    #[serde(
        rename = "insights_exclusivos",
        default,
        deserialize_with = "lenient::insights",
        skip_serializing_if = "Option::is_none"
    )]
    pub insights: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl PartialReport {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl From<&AnalysisReport> for PartialReport {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            segment: Some(Text::from(report.segment.clone())),
            product: report.product.clone().map(Text::from),
            audience: report.audience.clone().map(Text::from),
            price: report.price.clone(),
            revenue_goal: report.revenue_goal.clone(),
            web_research: Some(report.web_research.clone()),
            avatar: Some(report.avatar.clone()),
            mental_drivers: Some(report.mental_drivers.clone()),
            anti_objection: Some(report.anti_objection.clone()),
            visual_proofs: Some(report.visual_proofs.clone()),
            pre_pitch: Some(report.pre_pitch.clone()),
            competition: Some(report.competition.clone()),
            positioning: Some(report.positioning.clone()),
            keywords: Some(report.keywords.clone()),
            metrics: Some(report.metrics.clone()),
            projections: Some(report.projections.clone()),
            action_plan: Some(report.action_plan.clone()),
            insights: Some(report.insights.clone()),
            metadata: serde_json::to_value(&report.metadata).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_fields_default_while_siblings_survive() {
        let partial = PartialReport::from_value(json!({
            "segmento": "Saúde",
            "avatar_ultra_detalhado": "não é um objeto",
            "escopo": {
                "posicionamento_mercado": "Líder regional",
                "proposta_valor": 42,
                "diferenciais_competitivos": null
            },
            "metricas_performance_detalhadas": {
                "kpis_principais": [{"metrica": "CAC", "objetivo": 120}, "solto"],
                "roi_esperado": {"faixa": "300%"}
            }
        }))
        .unwrap();

        assert_eq!(partial.avatar, Some(Avatar::default()));

        let positioning = partial.positioning.unwrap();
        assert_eq!(positioning.market_positioning, "Líder regional");
        assert_eq!(positioning.value_proposition, "42");
        assert!(positioning.differentiators.is_empty());

        let metrics = partial.metrics.unwrap();
        assert_eq!(metrics.kpis.len(), 1);
        assert_eq!(metrics.kpis[0].target, "120");
        assert_eq!(metrics.expected_roi, "Faixa: 300%");
        assert!(partial.competition.is_none());
    }

    #[test]
    fn insights_accept_mixed_entries() {
        let partial = PartialReport::from_value(json!({
            "insights_exclusivos": ["primeiro", 2, {"a": "b"}]
        }))
        .unwrap();

        assert_eq!(
            partial.insights,
            Some(vec!["primeiro".to_string(), "2".to_string(), "A: b".to_string()])
        );
    }

    #[test]
    fn duration_formats_minutes_and_seconds() {
        assert_eq!(format_duration(0.4), "0m 0s");
        assert_eq!(format_duration(125.6), "2m 6s");
    }
}
