// Market Analyzer - API Core
//
// Builds marketing-analysis reports from web research and LLM stages,
// stores them in Postgres and renders them as PDF.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
