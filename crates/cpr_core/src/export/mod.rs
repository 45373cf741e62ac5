use serde::{Deserialize, Serialize};

use crate::domain::{IncidentData, ReportData};

pub const NONE_SPECIFIED: &str = "None specified";

pub const DISCLAIMER: &str = "Disclaimer: This document was generated with AI assistance for informational and documentation purposes only. It does not constitute legal advice. Always consult with a qualified legal professional for advice on your specific situation.";

/// Visual weight of a block; the document writer decides what each level looks like.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Report title, centered.
    Title,
    /// Date/time/jurisdiction line under the title, centered.
    Caption,
    /// Accent-colored section heading.
    Section,
    /// Plain bold heading.
    Subsection,
    Body,
    /// Small print.
    Fine,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentBlock {
    pub text: String,
    pub emphasis: Emphasis,
    pub is_heading: bool,
}

impl DocumentBlock {
    fn heading(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
            is_heading: true,
        }
    }

    fn text(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
            is_heading: false,
        }
    }
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}

/// Map an incident and its report to the ordered blocks of the exported document.
///
/// The order is fixed; only the "Supporting Evidence" section is conditional.
pub fn to_document_blocks(incident: &IncidentData, report: &ReportData) -> Vec<DocumentBlock> {
    let mut out = vec![
        DocumentBlock::heading(report.title.clone(), Emphasis::Title),
        DocumentBlock::text(
            format!(
                "Incident Date: {} | Time: {} | Jurisdiction: {}",
                incident.date, incident.time, incident.jurisdiction
            ),
            Emphasis::Caption,
        ),
        DocumentBlock::heading("AI Analysis", Emphasis::Section),
        DocumentBlock::text(format!("Category: {}", report.category), Emphasis::Body),
        DocumentBlock::text(format!("Severity: {}", report.severity), Emphasis::Body),
        DocumentBlock::text(
            format!("Justification: {}", report.severity_justification),
            Emphasis::Body,
        ),
        DocumentBlock::heading("Professional Summary", Emphasis::Section),
        DocumentBlock::text(report.professional_summary.clone(), Emphasis::Body),
        DocumentBlock::heading("Observed Impact on Children", Emphasis::Section),
        DocumentBlock::text(report.observed_impact.clone(), Emphasis::Body),
        DocumentBlock::heading("Parties Involved", Emphasis::Subsection),
        DocumentBlock::text(
            format!("Other Parties: {}", joined_or_none(&incident.parties)),
            Emphasis::Body,
        ),
        DocumentBlock::text(
            format!(
                "Children Present/Affected: {}",
                joined_or_none(&incident.children)
            ),
            Emphasis::Body,
        ),
        DocumentBlock::heading("Original Account", Emphasis::Subsection),
        DocumentBlock::text(format!("\"{}\"", incident.narrative), Emphasis::Body),
    ];

    if !incident.evidence.is_empty() {
        let names: Vec<&str> = incident.evidence.iter().map(|e| e.name.as_str()).collect();
        out.push(DocumentBlock::heading(
            "Supporting Evidence",
            Emphasis::Subsection,
        ));
        out.push(DocumentBlock::text(names.join(", "), Emphasis::Body));
    }

    out.extend([
        DocumentBlock::heading("Legal Insights (Not Legal Advice)", Emphasis::Section),
        DocumentBlock::text(report.legal_insights.clone(), Emphasis::Body),
        DocumentBlock::heading("AI Notes & Recommendations", Emphasis::Subsection),
        DocumentBlock::text(report.ai_notes.clone(), Emphasis::Body),
        DocumentBlock::heading("Sources", Emphasis::Subsection),
        DocumentBlock::text(report.sources.join(", "), Emphasis::Body),
        DocumentBlock::text(DISCLAIMER, Emphasis::Fine),
    ]);

    out
}

/// File name (without extension) for an exported report: `Incident-Report-<date>`.
pub fn export_file_stem(date: &str) -> String {
    format!("Incident-Report-{date}")
}

pub fn export_filename(date: &str, extension: &str) -> String {
    format!("{}.{}", export_file_stem(date), extension.trim_start_matches('.'))
}
