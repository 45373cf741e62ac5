use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::macros::format_description;

use crate::catalog;
use crate::domain::{EvidenceFile, IncidentData, ListField, ReportData, ScalarField, SelectedFile};
use crate::error::{codes, AppError};
use crate::evidence::EvidenceRegistry;
use crate::export::{to_document_blocks, DocumentBlock};
use crate::fallback::fallback_report;
use crate::store::IncidentStore;
use crate::validate::{can_advance, parse_date, validation_message, Clock, SystemClock};

/// Wizard steps in order. Serialized as their 1-based number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    DateTime = 1,
    Narrative = 2,
    Parties = 3,
    Location = 4,
    Review = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::DateTime,
        Step::Narrative,
        Step::Parties,
        Step::Location,
        Step::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn title(self) -> &'static str {
        catalog::STEP_TITLES[usize::from(self.number() - 1)]
    }

    /// Label of the forward button while on this step.
    pub fn forward_label(self) -> &'static str {
        match self {
            Step::Location => "Analyze Incident",
            _ => "Continue",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

impl TryFrom<u8> for Step {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::from_number(value).ok_or_else(|| {
            AppError::new(codes::WIZARD_INVALID_STEP, "Step must be between 1 and 5")
                .with_details(format!("step={value}"))
        })
    }
}

impl From<Step> for u8 {
    fn from(value: Step) -> Self {
        value.number()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// One generation request: a ticket id plus the frozen data it is built from.
///
/// `data` carries no evidence records, so an orphaned ticket never keeps evidence content
/// alive; `evidence_count` is all the request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub id: u64,
    pub data: Arc<IncidentData>,
    pub evidence_count: usize,
}

/// Side effects requested by a transition. The caller executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate(GenerationTicket),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    InFlight { ticket: u64 },
    Succeeded,
    FailedAndSubstituted,
}

/// Result of running one ticket. Failures already carry their substitute report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Succeeded(ReportData),
    FailedAndSubstituted { report: ReportData, error: AppError },
}

impl GenerationOutcome {
    /// Turn a collaborator result into an outcome, substituting the fallback on failure.
    pub fn from_result(data: &IncidentData, result: Result<ReportData, AppError>) -> Self {
        match result {
            Ok(report) => GenerationOutcome::Succeeded(report),
            Err(error) => {
                log::warn!("report generation failed, using fallback report: {error}");
                GenerationOutcome::FailedAndSubstituted {
                    report: fallback_report(data),
                    error,
                }
            }
        }
    }

    pub fn report(&self) -> &ReportData {
        match self {
            GenerationOutcome::Succeeded(report) => report,
            GenerationOutcome::FailedAndSubstituted { report, .. } => report,
        }
    }
}

/// Serializable view of the session for the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub step: Step,
    pub step_title: String,
    pub forward_label: String,
    pub can_advance: bool,
    pub validation_message: String,
    pub generation: GenerationState,
    pub has_report: bool,
    pub regenerate_enabled: bool,
    pub export_enabled: bool,
    pub evidence_count: usize,
}

/// One incident report session: wizard position, form data, report and generation state.
///
/// Transitions never perform I/O; those that need a report returned as [`Action`]s.
pub struct Session {
    step: Step,
    store: IncidentStore,
    report: Option<Arc<ReportData>>,
    generation: GenerationState,
    next_ticket: u64,
    custom_party: String,
    custom_child: String,
    registry: EvidenceRegistry,
    clock: Arc<dyn Clock>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("step", &self.step)
            .field("data", self.store.data())
            .field("report", &self.report)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            step: Step::DateTime,
            store: IncidentStore::new(),
            report: None,
            generation: GenerationState::Idle,
            next_ticket: 0,
            custom_party: String::new(),
            custom_child: String::new(),
            registry: EvidenceRegistry::new(),
            clock,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn data(&self) -> &IncidentData {
        self.store.data()
    }

    pub fn snapshot(&self) -> Arc<IncidentData> {
        self.store.snapshot()
    }

    pub fn report(&self) -> Option<&ReportData> {
        self.report.as_deref()
    }

    pub fn generation(&self) -> GenerationState {
        self.generation
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.generation, GenerationState::InFlight { .. })
    }

    pub fn evidence_registry(&self) -> &EvidenceRegistry {
        &self.registry
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.step, self.store.data(), self.clock.now())
    }

    pub fn validation_message(&self) -> &'static str {
        validation_message(self.store.data(), self.clock.now())
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            step: self.step,
            step_title: self.step.title().to_string(),
            forward_label: self.step.forward_label().to_string(),
            can_advance: self.can_advance(),
            validation_message: self.validation_message().to_string(),
            generation: self.generation,
            has_report: self.report.is_some(),
            regenerate_enabled: self.step == Step::Review && !self.is_generating(),
            export_enabled: self.step == Step::Review
                && self.report.is_some()
                && !self.is_generating(),
            evidence_count: self.store.data().evidence.len(),
        }
    }

    // -- form edits ------------------------------------------------------------------------

    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) {
        self.store.set_field(field, value);
    }

    pub fn toggle_array_item(&mut self, field: ListField, item: &str) {
        self.store.toggle_array_item(field, item);
    }

    pub fn add_custom_item(&mut self, field: ListField, value: &str) -> bool {
        self.store.add_custom_item(field, value)
    }

    pub fn custom_buffer(&self, field: ListField) -> &str {
        match field {
            ListField::Parties => &self.custom_party,
            ListField::Children => &self.custom_child,
        }
    }

    pub fn set_custom_buffer(&mut self, field: ListField, value: impl Into<String>) {
        *self.custom_buffer_mut(field) = value.into();
    }

    /// Submit the custom-input buffer. The buffer is cleared only when the item was appended.
    pub fn add_custom_from_buffer(&mut self, field: ListField) -> bool {
        let value = self.custom_buffer(field).to_string();
        let added = self.store.add_custom_item(field, &value);
        if added {
            self.custom_buffer_mut(field).clear();
        }
        added
    }

    fn custom_buffer_mut(&mut self, field: ListField) -> &mut String {
        match field {
            ListField::Parties => &mut self.custom_party,
            ListField::Children => &mut self.custom_child,
        }
    }

    /// Acquire content for each selected file and append the records in selection order.
    pub fn add_evidence(&mut self, files: Vec<SelectedFile>) -> usize {
        let captured_at = self
            .clock
            .now()
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .unwrap_or_default();
        let records: Vec<EvidenceFile> = files
            .into_iter()
            .map(|f| {
                let content = self.registry.acquire(f.bytes);
                EvidenceFile {
                    name: f.name,
                    size: content.len(),
                    mime_type: f.mime_type,
                    captured_at: captured_at.clone(),
                    content,
                }
            })
            .collect();
        let added = records.len();
        self.store.add_evidence(records);
        added
    }

    pub fn remove_evidence(&mut self, index: usize) -> bool {
        self.store.remove_evidence(index)
    }

    // -- transitions -----------------------------------------------------------------------

    /// Move forward when the current step is satisfied. Entering the review step requests a
    /// report unless one exists or is already being generated.
    pub fn advance(&mut self) -> Vec<Action> {
        if !self.can_advance() {
            return Vec::new();
        }
        let Some(next) = self.step.next() else {
            return Vec::new();
        };
        self.step = next;
        log::debug!("wizard advanced to step {next}");

        if next == Step::Review && self.report.is_none() && !self.is_generating() {
            return vec![Action::Generate(self.issue_ticket())];
        }
        Vec::new()
    }

    pub fn retreat(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            log::debug!("wizard moved back to step {prev}");
        }
    }

    /// Request a fresh report even if one exists. Only one generation may run at a time.
    pub fn regenerate(&mut self) -> Result<Vec<Action>, AppError> {
        if self.step != Step::Review {
            return Err(AppError::new(
                codes::WIZARD_NOT_ON_REVIEW,
                "Reports can only be regenerated from the review step",
            )
            .with_details(format!("step={}", self.step.number())));
        }
        if let GenerationState::InFlight { ticket } = self.generation {
            return Err(AppError::new(
                codes::GENERATION_IN_FLIGHT,
                "A report is already being generated",
            )
            .with_details(format!("ticket={ticket}"))
            .with_retryable(true));
        }
        Ok(vec![Action::Generate(self.issue_ticket())])
    }

    fn issue_ticket(&mut self) -> GenerationTicket {
        self.next_ticket += 1;
        let id = self.next_ticket;
        self.generation = GenerationState::InFlight { ticket: id };
        log::info!("report generation {id} requested");
        let current = self.store.data();
        GenerationTicket {
            id,
            data: Arc::new(IncidentData {
                date: current.date.clone(),
                time: current.time.clone(),
                narrative: current.narrative.clone(),
                parties: current.parties.clone(),
                children: current.children.clone(),
                jurisdiction: current.jurisdiction.clone(),
                evidence: Vec::new(),
            }),
            evidence_count: current.evidence.len(),
        }
    }

    /// Apply the outcome of a ticket. Outcomes for tickets that are no longer current (for
    /// example after a restart) are dropped. Returns whether the outcome was applied.
    pub fn complete_generation(&mut self, ticket_id: u64, outcome: GenerationOutcome) -> bool {
        match self.generation {
            GenerationState::InFlight { ticket } if ticket == ticket_id => {}
            _ => {
                log::info!("discarding stale generation result {ticket_id}");
                return false;
            }
        }
        let (report, state) = match outcome {
            GenerationOutcome::Succeeded(report) => (report, GenerationState::Succeeded),
            GenerationOutcome::FailedAndSubstituted { report, .. } => {
                (report, GenerationState::FailedAndSubstituted)
            }
        };
        self.report = Some(Arc::new(report));
        self.generation = state;
        log::info!("report generation {ticket_id} finished: {state:?}");
        true
    }

    /// Back to an empty session on step 1. Evidence blobs held only by this session are
    /// released; an in-flight generation is orphaned.
    pub fn restart(&mut self) {
        self.step = Step::DateTime;
        self.store.reset();
        self.report = None;
        self.generation = GenerationState::Idle;
        self.custom_party.clear();
        self.custom_child.clear();
        log::info!("session restarted");
    }

    // -- export ----------------------------------------------------------------------------

    /// Blocks for the document writer. Requires the review step, a report, no generation in
    /// flight and a `YYYY-MM-DD` incident date (it names the exported file).
    pub fn export_blocks(&self) -> Result<Vec<DocumentBlock>, AppError> {
        if self.is_generating() {
            return Err(AppError::new(
                codes::EXPORT_UNAVAILABLE,
                "Export is disabled while a report is being generated",
            )
            .with_retryable(true));
        }
        if self.step != Step::Review {
            return Err(AppError::new(
                codes::EXPORT_UNAVAILABLE,
                "Reports can only be exported from the review step",
            )
            .with_details(format!("step={}", self.step.number())));
        }
        let report = self.report.as_deref().ok_or_else(|| {
            AppError::new(codes::EXPORT_UNAVAILABLE, "No report has been generated yet")
        })?;
        let data = self.store.data();
        if parse_date(&data.date).is_none() {
            return Err(AppError::new(
                codes::EXPORT_UNAVAILABLE,
                "Incident date must be set as YYYY-MM-DD before export",
            )
            .with_details(format!("date={}", data.date)));
        }
        Ok(to_document_blocks(data, report))
    }
}
