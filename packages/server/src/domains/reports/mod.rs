//! PDF reports built from analysis results.

pub mod layout;
pub mod pdf;

use chrono::{DateTime, Utc};

use crate::common::AnalysisId;

pub use layout::{build_document, preview, Block, DocumentSection, PdfPreview};
pub use pdf::{render_pdf, PdfError};

/// Name for a PDF generated from a posted report.
pub fn generated_filename(at: DateTime<Utc>) -> String {
    format!("analise_mercado_{}.pdf", at.format("%Y%m%d_%H%M%S"))
}

/// Name for a PDF downloaded from a stored analysis.
pub fn download_filename(id: AnalysisId) -> String {
    format!("relatorio_analise_{}.pdf", id)
}
