//! The 13-stage report pipeline.
//!
//! Stages run strictly in [`STAGES`](super::stages::STAGES) order. LLM stages
//! never fail: a provider error or an unusable answer is replaced by the
//! stage's fallback. Computed stages can fail (an unparseable price), and any
//! such error turns the whole run into an emergency report built from the
//! fallback table.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::common::{
    ActionPlan, AnalysisReport, AnalysisRequest, AntiObjection, Avatar, Competition,
    KeywordStrategy, MentalDriver, PerformanceMetrics, Positioning, PrePitch, Projections,
    ReportMetadata, ValidationError, VisualProof, WebResearch, ANALYSIS_ENGINE,
    EMERGENCY_QUALITY_SCORE, EMERGENCY_STATUS, QUALITY_SCORE,
};
use crate::kernel::{BaseAI, ProgressSink, ServerDeps};

use super::derived::{self, DEFAULT_PRICE};
use super::fallbacks;
use super::parse::parse_section;
use super::prompts;
use super::research::WebResearcher;
use super::stages::{StageKey, TOTAL_STAGES};

pub const COMPLETENESS_MAXIMUM: &str = "MAXIMUM";
pub const COMPLETENESS_EMERGENCY: &str = "EMERGENCY";

pub const SYSTEMS_IMPLEMENTED: [&str; 5] = [
    "Dashboard do Avatar",
    "19 Drivers Mentais Universais",
    "Sistema Anti-Objeção",
    "Provas Visuais Instantâneas",
    "Pré-Pitch Invisível",
];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Preço inválido: {0}")]
    InvalidPrice(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Every section of a report, before metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSections {
    pub web_research: WebResearch,
    pub avatar: Avatar,
    pub mental_drivers: Vec<MentalDriver>,
    pub anti_objection: AntiObjection,
    pub visual_proofs: Vec<VisualProof>,
    pub pre_pitch: PrePitch,
    pub competition: Competition,
    pub positioning: Positioning,
    pub keywords: KeywordStrategy,
    pub metrics: PerformanceMetrics,
    pub projections: Projections,
    pub action_plan: ActionPlan,
    pub insights: Vec<String>,
}

impl ReportSections {
    /// The fallback table: every section's static substitute, with computed
    /// sections at the default price.
    pub fn fallback(segment: &str) -> Self {
        let web_research = WebResearch::default();
        let avatar = fallbacks::avatar(segment);
        let insights = derived::insights(segment, &web_research, &avatar);

        Self {
            web_research,
            avatar,
            mental_drivers: fallbacks::mental_drivers(segment),
            anti_objection: fallbacks::anti_objection(),
            visual_proofs: fallbacks::visual_proofs(),
            pre_pitch: fallbacks::pre_pitch(),
            competition: fallbacks::competition(segment),
            positioning: derived::positioning(segment),
            keywords: derived::keyword_strategy(segment),
            metrics: derived::performance_metrics(DEFAULT_PRICE),
            projections: derived::projections(DEFAULT_PRICE),
            action_plan: derived::action_plan(),
            insights,
        }
    }

    pub fn into_report(self, request: &AnalysisRequest, metadata: ReportMetadata) -> AnalysisReport {
        AnalysisReport {
            segment: request.segment().to_string(),
            product: request.product(),
            audience: request.audience(),
            price: request.price.clone(),
            revenue_goal: request.revenue_goal.clone(),
            web_research: self.web_research,
            avatar: self.avatar,
            mental_drivers: self.mental_drivers,
            anti_objection: self.anti_objection,
            visual_proofs: self.visual_proofs,
            pre_pitch: self.pre_pitch,
            competition: self.competition,
            positioning: self.positioning,
            keywords: self.keywords,
            metrics: self.metrics,
            projections: self.projections,
            action_plan: self.action_plan,
            insights: self.insights,
            metadata,
            error: None,
            status: None,
            database_id: None,
        }
    }
}

fn metadata(started: Instant, emergency: bool) -> ReportMetadata {
    ReportMetadata {
        processing_time_seconds: started.elapsed().as_secs_f64(),
        analysis_engine: ANALYSIS_ENGINE.to_string(),
        generated_at: Utc::now(),
        quality_score: if emergency {
            EMERGENCY_QUALITY_SCORE
        } else {
            QUALITY_SCORE
        },
        completeness_level: if emergency {
            COMPLETENESS_EMERGENCY
        } else {
            COMPLETENESS_MAXIMUM
        }
        .to_string(),
        systems_implemented: SYSTEMS_IMPLEMENTED.iter().map(|s| s.to_string()).collect(),
        processing_time_formatted: None,
        request_timestamp: None,
        session_id: None,
        input_data: None,
    }
}

/// Emergency report for a run that failed with `error`.
pub fn emergency_report(request: &AnalysisRequest, error: &str, started: Instant) -> AnalysisReport {
    let mut report =
        ReportSections::fallback(request.segment()).into_report(request, metadata(started, true));
    report.error = Some(error.to_string());
    report.status = Some(EMERGENCY_STATUS.to_string());
    report
}

pub struct AnalysisEngine {
    ai: Arc<dyn BaseAI>,
    researcher: WebResearcher,
}

impl AnalysisEngine {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            ai: deps.ai.clone(),
            researcher: WebResearcher::new(
                deps.search.clone(),
                deps.scraper.clone(),
                deps.research_delay,
            ),
        }
    }

    /// Run every stage and assemble the report. Always returns a report with
    /// all sections; failures surface as an emergency report.
    pub async fn generate(
        &self,
        request: &AnalysisRequest,
        progress: Option<&dyn ProgressSink>,
    ) -> AnalysisReport {
        let started = Instant::now();
        info!(segment = %request.segment(), "Starting analysis");

        let report = match self.run_stages(request, progress).await {
            Ok(sections) => {
                let report = sections.into_report(request, metadata(started, false));
                info!(
                    segment = %request.segment(),
                    seconds = report.metadata.processing_time_seconds,
                    "Analysis completed"
                );
                report
            }
            Err(e) => {
                error!(segment = %request.segment(), error = %e, "Analysis failed, returning emergency report");
                emergency_report(request, &e.to_string(), started)
            }
        };

        if let Some(sink) = progress {
            sink.on_complete().await;
        }
        report
    }

    async fn run_stages(
        &self,
        request: &AnalysisRequest,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<ReportSections, PipelineError> {
        request.validate()?;
        let segment = request.segment();

        enter(progress, StageKey::WebResearch).await;
        let web_research = self.researcher.run(request).await;

        enter(progress, StageKey::Avatar).await;
        let avatar: Avatar = self
            .llm_stage(StageKey::Avatar, prompts::avatar(request, &web_research), || {
                fallbacks::avatar(segment)
            })
            .await;

        enter(progress, StageKey::MentalDrivers).await;
        let mental_drivers: Vec<MentalDriver> = self
            .llm_stage(
                StageKey::MentalDrivers,
                prompts::mental_drivers(request, &avatar),
                || fallbacks::mental_drivers(segment),
            )
            .await;

        enter(progress, StageKey::AntiObjection).await;
        let anti_objection: AntiObjection = self
            .llm_stage(
                StageKey::AntiObjection,
                prompts::anti_objection(&avatar),
                fallbacks::anti_objection,
            )
            .await;

        enter(progress, StageKey::VisualProofs).await;
        let visual_proofs: Vec<VisualProof> = self
            .llm_stage(
                StageKey::VisualProofs,
                prompts::visual_proofs(request, &mental_drivers),
                fallbacks::visual_proofs,
            )
            .await;

        enter(progress, StageKey::PrePitch).await;
        let pre_pitch: PrePitch = self
            .llm_stage(
                StageKey::PrePitch,
                prompts::pre_pitch(&mental_drivers, &avatar),
                fallbacks::pre_pitch,
            )
            .await;

        enter(progress, StageKey::Competition).await;
        let competition: Competition = self
            .llm_stage(
                StageKey::Competition,
                prompts::competition(request, &web_research),
                || fallbacks::competition(segment),
            )
            .await;

        enter(progress, StageKey::Positioning).await;
        let positioning = derived::positioning(segment);

        enter(progress, StageKey::Keywords).await;
        let keywords = derived::keyword_strategy(segment);

        enter(progress, StageKey::Metrics).await;
        let price = derived::resolve_price(request.price.as_ref())?;
        let metrics = derived::performance_metrics(price);

        enter(progress, StageKey::Projections).await;
        let projections = derived::projections(price);

        enter(progress, StageKey::ActionPlan).await;
        let action_plan = derived::action_plan();

        enter(progress, StageKey::Insights).await;
        let insights = derived::insights(segment, &web_research, &avatar);

        Ok(ReportSections {
            web_research,
            avatar,
            mental_drivers,
            anti_objection,
            visual_proofs,
            pre_pitch,
            competition,
            positioning,
            keywords,
            metrics,
            projections,
            action_plan,
            insights,
        })
    }

    async fn llm_stage<T, F>(&self, key: StageKey, prompt: String, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let spec = key.spec();

        let raw = match self.ai.complete(&prompt, spec.max_tokens).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(stage = spec.section, error = %e, "LLM call failed, using fallback");
                return fallback();
            }
        };

        match parse_section::<T>(&raw, spec.kind) {
            Ok(section) => {
                debug!(stage = spec.section, chars = raw.len(), "Stage parsed");
                section
            }
            Err(e) => {
                warn!(stage = spec.section, error = %e, "Unusable LLM answer, using fallback");
                fallback()
            }
        }
    }
}

async fn enter(progress: Option<&dyn ProgressSink>, key: StageKey) {
    let spec = key.spec();
    debug!(step = spec.step, stage = spec.section, "{}", spec.message);
    if let Some(sink) = progress {
        sink.on_stage(spec.step, TOTAL_STAGES, spec.message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Text;
    use crate::kernel::test_dependencies::{MockAI, TestDependencies};
    use serde_json::json;

    fn engine(ai: MockAI) -> (AnalysisEngine, TestDependencies) {
        let deps = TestDependencies::new().mock_ai(ai);
        (AnalysisEngine::new(&deps.into_deps()), deps)
    }

    #[tokio::test]
    async fn non_json_answers_fall_back_per_stage() {
        let (engine, deps) = engine(MockAI::new());
        let report = engine.generate(&AnalysisRequest::new("Fitness"), None).await;

        assert!(!report.is_emergency());
        assert_eq!(report.avatar, fallbacks::avatar("Fitness"));
        assert_eq!(report.competition, fallbacks::competition("Fitness"));
        assert_eq!(report.metadata.quality_score, QUALITY_SCORE);
        assert_eq!(deps.ai.call_count(), 6);
        assert_eq!(
            deps.ai.token_limits(),
            vec![8192, 8192, 8192, 8192, 8192, 6144]
        );
    }

    #[tokio::test]
    async fn parsed_sections_flow_into_later_prompts() {
        let ai = MockAI::new()
            .with_response("```json\n{\"nome_ficticio\": \"Ana Maratonista\"}\n```")
            .with_json_response(&json!([{"nome": "Relógio Psicológico"}]));
        let (engine, deps) = engine(ai);

        let report = engine.generate(&AnalysisRequest::new("Corrida"), None).await;

        assert_eq!(report.avatar.persona_name, Some(Text::from("Ana Maratonista")));
        assert_eq!(
            report.mental_drivers[0].name,
            Some(Text::from("Relógio Psicológico"))
        );
        let calls = deps.ai.calls();
        assert!(calls[1].contains("Ana Maratonista"));
        assert!(calls[3].contains("Relógio Psicológico"));
    }

    #[tokio::test]
    async fn list_stage_rejects_object_answer() {
        let ai = MockAI::new()
            .with_error("provider down")
            .with_json_response(&json!({"nome": "não é lista"}));
        let (engine, _deps) = engine(ai);

        let report = engine.generate(&AnalysisRequest::new("Varejo"), None).await;

        assert_eq!(report.avatar, fallbacks::avatar("Varejo"));
        assert_eq!(report.mental_drivers, fallbacks::mental_drivers("Varejo"));
    }

    #[tokio::test]
    async fn invalid_price_produces_emergency_report() {
        let (engine, _deps) = engine(MockAI::new());
        let mut request = AnalysisRequest::new("Moda");
        request.price = Some(Text::from("caro demais"));

        let report = engine.generate(&request, None).await;

        assert!(report.is_emergency());
        assert_eq!(report.status.as_deref(), Some(EMERGENCY_STATUS));
        assert_eq!(report.error.as_deref(), Some("Preço inválido: caro demais"));
        assert_eq!(report.metadata.quality_score, EMERGENCY_QUALITY_SCORE);
        assert_eq!(report.metadata.completeness_level, COMPLETENESS_EMERGENCY);
        assert_eq!(report.metrics, derived::performance_metrics(DEFAULT_PRICE));
    }

    #[tokio::test]
    async fn progress_reports_every_stage_then_completion() {
        let (engine, deps) = engine(MockAI::new());
        let mut rx = deps.progress.subscribe("s1").await;
        let sink = deps.progress.sink("s1");

        engine
            .generate(&AnalysisRequest::new("Pets"), Some(&sink as &dyn ProgressSink))
            .await;

        let mut steps = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            steps.push((snapshot.current_step, snapshot.completed));
        }
        assert_eq!(steps.len(), TOTAL_STAGES + 1);
        assert_eq!(steps[0], (1, false));
        assert_eq!(steps[TOTAL_STAGES - 1], (TOTAL_STAGES, false));
        assert_eq!(steps[TOTAL_STAGES], (TOTAL_STAGES, true));
    }
}
