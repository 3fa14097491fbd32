//! Analysis domain: the report pipeline and persistence of its results.

pub mod derived;
pub mod fallbacks;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod research;
pub mod stages;
pub mod store;

pub use pipeline::{AnalysisEngine, PipelineError, ReportSections};
pub use research::WebResearcher;
pub use stages::{StageKey, StageKind, StageSpec, STAGES, TOTAL_STAGES};
pub use store::PgAnalysisStore;
