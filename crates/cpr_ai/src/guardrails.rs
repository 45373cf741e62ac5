use cpr_core::domain::ReportData;
use cpr_core::error::{codes, AppError};

/// Reject reports with blank required text or no sources.
pub fn enforce_complete(report: &ReportData) -> Result<(), AppError> {
    let blank = report.blank_fields();
    if !blank.is_empty() {
        return Err(AppError::new(
            codes::AI_RESPONSE_INCOMPLETE,
            "Report response is missing required content",
        )
        .with_details(format!("fields={}", blank.join(","))));
    }
    Ok(())
}

/// Parse the model's JSON into a report. Every schema field is required.
pub fn parse_report_json(text: &str) -> Result<ReportData, AppError> {
    let report: ReportData = serde_json::from_str(text.trim()).map_err(|e| {
        AppError::new(
            codes::AI_RESPONSE_MALFORMED,
            "Report response does not match the report schema",
        )
        .with_details(e.to_string())
    })?;
    enforce_complete(&report)?;
    Ok(report)
}
