//! Session controller for the incident report wizard.
//!
//! The public methods of [`ReportSessionController`], plus [`catalog_view`] and
//! [`ai_health_check`], are the command surface a UI shell registers; each returns
//! `Result<_, AppError>` so errors reach the frontend as structured JSON.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use cpr_ai::gemini::{GeminiClient, GeminiConfig};
use cpr_ai::llm::gemini_llm::GeminiReportGenerator;
use cpr_ai::llm::ReportGenerator;
use cpr_ai::report::execute;
use cpr_core::catalog;
use cpr_core::domain::{IncidentData, ListField, ReportData, ScalarField, SelectedFile};
use cpr_core::error::{codes, AppError};
use cpr_core::layout::{paginate, DocumentWriter, PageLayout, TextDocumentWriter};
use cpr_core::validate::{Clock, SystemClock};
use cpr_core::wizard::{Action, GenerationOutcome, GenerationTicket, Session, SessionStatus};

mod config;

pub use config::{AppConfig, GenerationMode};

pub type SharedGenerator = Arc<dyn ReportGenerator + Send + Sync>;
pub type SharedWriter = Arc<dyn DocumentWriter + Send + Sync>;

#[derive(Debug, serde::Serialize)]
pub struct AiHealthStatus {
    pub ok: bool,
    pub message: String,
}

/// Choice lists for the wizard's pickers.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub parties: Vec<&'static str>,
    pub children: Vec<&'static str>,
    pub jurisdictions: Vec<&'static str>,
    pub evidence_accept: &'static str,
}

/// Everything the UI renders for the current session.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub status: SessionStatus,
    pub data: IncidentData,
    pub report: Option<ReportData>,
}

pub fn catalog_view() -> CatalogView {
    CatalogView {
        parties: catalog::PREDEFINED_PARTIES.to_vec(),
        children: catalog::PREDEFINED_CHILDREN.to_vec(),
        jurisdictions: catalog::JURISDICTIONS.to_vec(),
        evidence_accept: catalog::EVIDENCE_ACCEPT,
    }
}

pub fn ai_health_check(config: &GeminiConfig) -> AiHealthStatus {
    let client = match GeminiClient::new(config.clone()) {
        Ok(c) => c,
        Err(e) => {
            return AiHealthStatus {
                ok: false,
                message: e.to_string(),
            }
        }
    };
    match client.health_check() {
        Ok(()) => AiHealthStatus {
            ok: true,
            message: format!("Model {} is reachable", client.model()),
        },
        Err(e) => AiHealthStatus {
            ok: false,
            message: e.to_string(),
        },
    }
}

fn lock_session(session: &Mutex<Session>) -> Result<MutexGuard<'_, Session>, AppError> {
    session.lock().map_err(|_| {
        AppError::new(
            codes::SESSION_LOCK_POISONED,
            "Session state is unavailable after a previous failure",
        )
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs one ticket to completion and applies the outcome. A panicking generator is treated
/// like any other generation failure, so the ticket always completes.
fn run_ticket(
    session: &Mutex<Session>,
    generator: &(dyn ReportGenerator + Send + Sync),
    ticket: GenerationTicket,
) -> Result<bool, AppError> {
    let id = ticket.id;
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| execute(generator, &ticket))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let error = AppError::new(
                codes::GENERATION_WORKER_FAILED,
                "Report generator panicked",
            )
            .with_details(panic_message(payload.as_ref()));
            GenerationOutcome::from_result(&ticket.data, Err(error))
        }
    };
    // Release our hold on the frozen data before re-entering the session.
    drop(ticket);
    let mut s = lock_session(session)?;
    Ok(s.complete_generation(id, outcome))
}

/// Owns one incident session and executes the side effects its transitions request.
pub struct ReportSessionController {
    session: Arc<Mutex<Session>>,
    generator: SharedGenerator,
    writer: SharedWriter,
    layout: PageLayout,
    mode: GenerationMode,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ReportSessionController {
    pub fn new(
        clock: Arc<dyn Clock>,
        generator: SharedGenerator,
        writer: SharedWriter,
        layout: PageLayout,
        mode: GenerationMode,
    ) -> Result<Self, AppError> {
        layout.validate()?;
        Ok(Self {
            session: Arc::new(Mutex::new(Session::new(clock))),
            generator,
            writer,
            layout,
            mode,
            workers: Mutex::new(Vec::new()),
        })
    }

    /// Gemini generator and plain-text writer, wired from `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let client = GeminiClient::new(config.gemini)?;
        log::info!(
            "report generation via {} (model {})",
            client.base_url(),
            client.model()
        );
        Self::new(
            Arc::new(SystemClock),
            Arc::new(GeminiReportGenerator::new(client)),
            Arc::new(TextDocumentWriter::new(config.export_dir)),
            config.layout,
            config.generation_mode,
        )
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        lock_session(&self.session)
    }

    pub fn status(&self) -> Result<SessionStatus, AppError> {
        Ok(self.lock()?.status())
    }

    pub fn view(&self) -> Result<SessionView, AppError> {
        let s = self.lock()?;
        Ok(SessionView {
            status: s.status(),
            data: s.data().clone(),
            report: s.report().cloned(),
        })
    }

    pub fn report(&self) -> Result<Option<ReportData>, AppError> {
        Ok(self.lock()?.report().cloned())
    }

    pub fn data(&self) -> Result<Arc<IncidentData>, AppError> {
        Ok(self.lock()?.snapshot())
    }

    pub fn set_field(&self, field: ScalarField, value: String) -> Result<SessionStatus, AppError> {
        let mut s = self.lock()?;
        s.set_field(field, value);
        Ok(s.status())
    }

    pub fn toggle_item(&self, field: ListField, item: &str) -> Result<SessionStatus, AppError> {
        let mut s = self.lock()?;
        s.toggle_array_item(field, item);
        Ok(s.status())
    }

    pub fn set_custom_buffer(&self, field: ListField, value: String) -> Result<(), AppError> {
        self.lock()?.set_custom_buffer(field, value);
        Ok(())
    }

    pub fn add_custom_from_buffer(&self, field: ListField) -> Result<bool, AppError> {
        Ok(self.lock()?.add_custom_from_buffer(field))
    }

    pub fn add_evidence(&self, files: Vec<SelectedFile>) -> Result<usize, AppError> {
        Ok(self.lock()?.add_evidence(files))
    }

    pub fn remove_evidence(&self, index: usize) -> Result<bool, AppError> {
        Ok(self.lock()?.remove_evidence(index))
    }

    pub fn advance(&self) -> Result<SessionStatus, AppError> {
        let actions = self.lock()?.advance();
        self.dispatch(actions)?;
        self.status()
    }

    pub fn retreat(&self) -> Result<SessionStatus, AppError> {
        let mut s = self.lock()?;
        s.retreat();
        Ok(s.status())
    }

    pub fn regenerate(&self) -> Result<SessionStatus, AppError> {
        let actions = self.lock()?.regenerate()?;
        self.dispatch(actions)?;
        self.status()
    }

    pub fn restart(&self) -> Result<SessionStatus, AppError> {
        let mut s = self.lock()?;
        s.restart();
        Ok(s.status())
    }

    fn dispatch(&self, actions: Vec<Action>) -> Result<(), AppError> {
        for action in actions {
            match action {
                Action::Generate(ticket) => self.spawn_generation(ticket)?,
            }
        }
        Ok(())
    }

    fn spawn_generation(&self, ticket: GenerationTicket) -> Result<(), AppError> {
        match self.mode {
            GenerationMode::Inline => {
                run_ticket(&self.session, self.generator.as_ref(), ticket)?;
            }
            GenerationMode::Background => {
                let session = Arc::clone(&self.session);
                let generator = Arc::clone(&self.generator);
                let handle = thread::spawn(move || {
                    let id = ticket.id;
                    if let Err(e) = run_ticket(&session, generator.as_ref(), ticket) {
                        log::error!("generation {id} could not be applied: {e}");
                    }
                });
                let mut workers = self.workers.lock().map_err(|_| {
                    AppError::new(
                        codes::SESSION_LOCK_POISONED,
                        "Generation worker list is unavailable",
                    )
                })?;
                workers.retain(|h| !h.is_finished());
                workers.push(handle);
            }
        }
        Ok(())
    }

    /// Block until every spawned generation has finished and been applied.
    pub fn wait_for_generation(&self) -> Result<(), AppError> {
        let handles: Vec<JoinHandle<()>> = match self.workers.lock() {
            Ok(mut w) => w.drain(..).collect(),
            Err(_) => {
                return Err(AppError::new(
                    codes::SESSION_LOCK_POISONED,
                    "Generation worker list is unavailable",
                ))
            }
        };
        for handle in handles {
            handle.join().map_err(|_| {
                AppError::new(
                    codes::GENERATION_WORKER_FAILED,
                    "Report generation worker panicked",
                )
            })?;
        }
        Ok(())
    }

    /// Write the report document and return its path. State is unchanged on failure.
    pub fn export(&self) -> Result<PathBuf, AppError> {
        let (blocks, date) = {
            let s = self.lock()?;
            (s.export_blocks()?, s.data().date.clone())
        };
        let pages = paginate(&blocks, self.layout)?;
        self.writer.write(&date, &pages, self.layout).map_err(|e| {
            log::warn!("export failed: {e}");
            if e.is(codes::EXPORT_FAILED) {
                e
            } else {
                AppError::new(codes::EXPORT_FAILED, "Failed to export report")
                    .with_details(e.to_string())
                    .with_retryable(true)
            }
        })
    }
}
