use serde_json::{json, Value};

use super::ReportRequest;

pub fn incident_report_prompt(req: &ReportRequest) -> String {
    format!(
        r#"You are a legal documentation AI specialist. Analyze this co-parenting incident and generate a comprehensive report in JSON format.

INCIDENT DETAILS:
- Date: {date}
- Time: {time}
- Jurisdiction: {jurisdiction}
- Parties Involved: {parties}
- Children Present/Affected: {children}
- Evidence Attached: {evidence} file(s)
- Original Account: {narrative}

Analyze the incident details and generate a JSON object that strictly adheres to the provided schema. Focus on objective, factual reporting suitable for legal review.
For the legalInsights, provide analysis specific to family law in {jurisdiction}.
"#,
        date = req.date,
        time = req.time,
        jurisdiction = req.jurisdiction,
        parties = req.parties,
        children = req.children,
        evidence = req.evidence_count,
        narrative = req.narrative,
    )
}

/// Response schema sent with every request. Field names match `ReportData` on the wire.
pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "Brief descriptive title of the incident"
            },
            "category": {
                "type": "STRING",
                "description": "One of: Child Safety/Welfare Concern, Communication Issues, Schedule Violations, Breach of Court Order, Parental Alienation, Inappropriate Behavior, Financial Disputes, or Other"
            },
            "severity": {
                "type": "STRING",
                "description": "Low, Medium, or High"
            },
            "severityJustification": {
                "type": "STRING",
                "description": "1-2 sentence explanation of why this severity level was assigned"
            },
            "professionalSummary": {
                "type": "STRING",
                "description": "Comprehensive 2-3 paragraph professional summary removing emotional language while preserving all factual details, dates, times, and specific actions"
            },
            "observedImpact": {
                "type": "STRING",
                "description": "1-2 paragraph analysis of the potential or observed impact on the children involved"
            },
            "legalInsights": {
                "type": "STRING",
                "description": "2-3 paragraph analysis of relevant family law principles, jurisdictional considerations, and legal implications specific to the provided jurisdiction"
            },
            "sources": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3-5 potential legal or informational sources like 'justice.gc.ca'"
            },
            "aiNotes": {
                "type": "STRING",
                "description": "Brief notes about documentation completeness and recommendations for evidence collection"
            }
        },
        "required": [
            "title",
            "category",
            "severity",
            "severityJustification",
            "professionalSummary",
            "observedImpact",
            "legalInsights",
            "sources",
            "aiNotes"
        ]
    })
}
