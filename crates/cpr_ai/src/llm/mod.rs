use cpr_core::domain::ReportData;
use cpr_core::error::AppError;

use crate::report::ReportRequest;

/// External collaborator that turns an incident request into a report.
///
/// All-or-nothing: an implementation either returns a complete report or an error.
pub trait ReportGenerator {
    fn generate(&self, request: &ReportRequest) -> Result<ReportData, AppError>;
}

pub mod gemini_llm;
