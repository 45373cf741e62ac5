use cpr_core::domain::{IncidentData, ReportData};
use cpr_core::error::AppError;
use cpr_core::export::NONE_SPECIFIED;
use cpr_core::wizard::{GenerationOutcome, GenerationTicket};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::guardrails::enforce_complete;
use crate::llm::ReportGenerator;

pub mod prompts;

/// Placeholder used in the request when no children were selected.
pub const CHILDREN_PLACEHOLDER: &str = NONE_SPECIFIED;

/// The incident as the generator sees it. Evidence is reduced to a count; file contents are
/// never sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRequest {
    pub date: String,
    pub time: String,
    pub jurisdiction: String,
    pub parties: String,
    pub children: String,
    pub evidence_count: usize,
    pub narrative: String,
}

impl ReportRequest {
    pub fn from_incident(data: &IncidentData) -> Self {
        let children = if data.children.is_empty() {
            CHILDREN_PLACEHOLDER.to_string()
        } else {
            data.children.join(", ")
        };
        Self {
            date: data.date.clone(),
            time: data.time.clone(),
            jurisdiction: data.jurisdiction.clone(),
            parties: data.parties.join(", "),
            children,
            evidence_count: data.evidence.len(),
            narrative: data.narrative.clone(),
        }
    }

    /// Stable hash of the request, used to correlate log lines without logging the narrative.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.date.as_str(),
            self.time.as_str(),
            self.jurisdiction.as_str(),
            self.parties.as_str(),
            self.children.as_str(),
            self.narrative.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(self.evidence_count.to_le_bytes());
        hex::encode(hasher.finalize())
    }
}

fn generate_checked(
    generator: &dyn ReportGenerator,
    request: &ReportRequest,
) -> Result<ReportData, AppError> {
    let report = generator.generate(request)?;
    enforce_complete(&report)?;
    Ok(report)
}

/// Run the generator for `data`. Never fails: any error yields the fallback report.
pub fn run_generation(generator: &dyn ReportGenerator, data: &IncidentData) -> GenerationOutcome {
    run_request(generator, ReportRequest::from_incident(data), data)
}

/// Run one ticket. The ticket's data carries no evidence records, so the count comes from the
/// ticket itself.
pub fn execute(generator: &dyn ReportGenerator, ticket: &GenerationTicket) -> GenerationOutcome {
    log::debug!("executing generation ticket {}", ticket.id);
    let request = ReportRequest {
        evidence_count: ticket.evidence_count,
        ..ReportRequest::from_incident(&ticket.data)
    };
    run_request(generator, request, &ticket.data)
}

fn run_request(
    generator: &dyn ReportGenerator,
    request: ReportRequest,
    data: &IncidentData,
) -> GenerationOutcome {
    let fingerprint = request.fingerprint();
    log::debug!("generating report for request {}", &fingerprint[..12]);
    let result = generate_checked(generator, &request);
    if result.is_ok() {
        log::info!("report generated for request {}", &fingerprint[..12]);
    }
    GenerationOutcome::from_result(data, result)
}
