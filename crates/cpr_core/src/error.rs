use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes shared by the session, generation and export layers.
pub mod codes {
    pub const WIZARD_INVALID_STEP: &str = "WIZARD_INVALID_STEP";
    pub const WIZARD_NOT_ON_REVIEW: &str = "WIZARD_NOT_ON_REVIEW";
    pub const GENERATION_IN_FLIGHT: &str = "GENERATION_IN_FLIGHT";
    pub const GENERATION_WORKER_FAILED: &str = "GENERATION_WORKER_FAILED";

    pub const AI_CREDENTIAL_MISSING: &str = "AI_CREDENTIAL_MISSING";
    pub const AI_REQUEST_FAILED: &str = "AI_REQUEST_FAILED";
    pub const AI_RESPONSE_MALFORMED: &str = "AI_RESPONSE_MALFORMED";
    pub const AI_RESPONSE_INCOMPLETE: &str = "AI_RESPONSE_INCOMPLETE";
    pub const AI_SEVERITY_INVALID: &str = "AI_SEVERITY_INVALID";

    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    pub const EXPORT_UNAVAILABLE: &str = "EXPORT_UNAVAILABLE";
    pub const EXPORT_LAYOUT_INVALID: &str = "EXPORT_LAYOUT_INVALID";
    pub const EXPORT_FAILED: &str = "EXPORT_FAILED";

    pub const SESSION_LOCK_POISONED: &str = "SESSION_LOCK_POISONED";
}

/// Structured error returned by every fallible operation in the workspace.
///
/// Validation problems are never reported through this type; they gate navigation instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {} ({details})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
