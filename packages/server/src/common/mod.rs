// Common types shared by the analysis pipeline, persistence and PDF rendering

pub mod entity_ids;
pub mod report;
pub mod text;
pub mod types;

pub use entity_ids::*;
pub use report::*;
pub use text::*;
pub use types::*;
