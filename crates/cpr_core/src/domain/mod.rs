use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};
use crate::evidence::EvidenceBlob;

/// A file attached to the incident as supporting evidence.
///
/// Notes:
/// - `size` is the byte length of the content the blob was acquired from.
/// - `captured_at` is a display string taken from the session clock at selection time.
/// - The blob is released when the last clone of this record is dropped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub captured_at: String,
    pub content: EvidenceBlob,
}

impl EvidenceFile {
    /// Size as shown next to the file name, e.g. `"12.3 KB"`.
    pub fn display_size(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }
}

/// Raw input from the file-selection boundary. No type or size checks happen in the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Mutable aggregate for one incident session.
///
/// Empty strings mean "not provided yet".
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentData {
    pub date: String,
    pub time: String,
    pub narrative: String,
    pub parties: Vec<String>,
    pub children: Vec<String>,
    pub jurisdiction: String,
    pub evidence: Vec<EvidenceFile>,
}

impl IncidentData {
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Date => &self.date,
            ScalarField::Time => &self.time,
            ScalarField::Narrative => &self.narrative,
            ScalarField::Jurisdiction => &self.jurisdiction,
        }
    }

    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Parties => &self.parties,
            ListField::Children => &self.children,
        }
    }

    pub(crate) fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::Date => &mut self.date,
            ScalarField::Time => &mut self.time,
            ScalarField::Narrative => &mut self.narrative,
            ScalarField::Jurisdiction => &mut self.jurisdiction,
        }
    }

    pub(crate) fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Parties => &mut self.parties,
            ListField::Children => &mut self.children,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    Date,
    Time,
    Narrative,
    Jurisdiction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ListField {
    Parties,
    Children,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Severity::parse(&value).ok_or_else(|| {
            AppError::new(codes::AI_SEVERITY_INVALID, "Severity must be Low, Medium or High")
                .with_details(format!("value={value}"))
        })
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident taxonomy the report model is asked to choose from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Category {
    ChildSafetyWelfare,
    CommunicationIssues,
    ScheduleViolations,
    BreachOfCourtOrder,
    ParentalAlienation,
    InappropriateBehavior,
    FinancialDisputes,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::ChildSafetyWelfare,
        Category::CommunicationIssues,
        Category::ScheduleViolations,
        Category::BreachOfCourtOrder,
        Category::ParentalAlienation,
        Category::InappropriateBehavior,
        Category::FinancialDisputes,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ChildSafetyWelfare => "Child Safety/Welfare Concern",
            Category::CommunicationIssues => "Communication Issues",
            Category::ScheduleViolations => "Schedule Violations",
            Category::BreachOfCourtOrder => "Breach of Court Order",
            Category::ParentalAlienation => "Parental Alienation",
            Category::InappropriateBehavior => "Inappropriate Behavior",
            Category::FinancialDisputes => "Financial Disputes",
            Category::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value).unwrap_or_else(|| {
            log::warn!("unrecognized report category {value:?}; using Other");
            Category::Other
        })
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report produced by the generation step (or substituted by the fallback).
///
/// Every field is required on the wire; a response missing any of them is a generation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub title: String,
    pub category: Category,
    pub severity: Severity,
    pub severity_justification: String,
    pub professional_summary: String,
    pub observed_impact: String,
    pub legal_insights: String,
    pub sources: Vec<String>,
    pub ai_notes: String,
}

impl ReportData {
    /// Names of required text fields that are blank, plus `sources` when it is empty.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        for (name, value) in [
            ("title", &self.title),
            ("severityJustification", &self.severity_justification),
            ("professionalSummary", &self.professional_summary),
            ("observedImpact", &self.observed_impact),
            ("legalInsights", &self.legal_insights),
            ("aiNotes", &self.ai_notes),
        ] {
            if value.trim().is_empty() {
                out.push(name);
            }
        }
        if self.sources.iter().all(|s| s.trim().is_empty()) {
            out.push("sources");
        }
        out
    }
}
