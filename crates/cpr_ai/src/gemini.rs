use std::fmt;
use std::time::Duration;

use cpr_core::error::{codes, AppError};

/// Environment variable holding the generation credential. The only one the system reads.
pub const API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Defaults plus the credential from `API_KEY`.
    ///
    /// A missing key is not an error here: every generation call will fail and the session
    /// falls back to the substitute report.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            log::warn!("{API_KEY_ENV} is not set; report generation will always use the fallback report");
        }
        Self {
            api_key,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

fn is_loopback_stub(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("http://127.0.0.1") else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(port) = rest.strip_prefix(':') else {
        return false;
    };
    matches!(port.parse::<u16>(), Ok(p) if p != 0)
}

fn is_https_origin(url: &str) -> bool {
    let Some(host) = url.strip_prefix("https://") else {
        return false;
    };
    !host.is_empty()
        && !host.contains(['/', '@', '?', '#'])
        && !host.chars().any(char::is_whitespace)
}

impl GeminiClient {
    /// Build a client. The base URL must be an https origin, or `http://127.0.0.1[:port]` for
    /// local stubs, so the credential never travels in clear text to a remote host.
    pub fn new(config: GeminiConfig) -> Result<Self, AppError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !is_https_origin(&base_url) && !is_loopback_stub(&base_url) {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "Generation base URL must be an https origin or http://127.0.0.1",
            )
            .with_details(format!("base_url={base_url}")));
        }
        if config.model.trim().is_empty() || config.model.contains(['/', '?', '#', ' ']) {
            return Err(AppError::new(codes::CONFIG_INVALID, "Generation model name is invalid")
                .with_details(format!("model={}", config.model)));
        }
        if config.timeout.is_zero() {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "Generation timeout must be positive",
            ));
        }
        Ok(Self {
            base_url,
            model: config.model,
            api_key: config.api_key,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn generate_content_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    pub(crate) fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::new(
                codes::AI_CREDENTIAL_MISSING,
                "No API key configured for report generation",
            )
            .with_details(format!("env={API_KEY_ENV}"))
        })
    }

    /// Check that the configured model is reachable with the configured key.
    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);
        let resp = ureq::get(&url)
            .timeout(Duration::from_secs(5))
            .set("x-goog-api-key", self.api_key()?)
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new(codes::AI_REQUEST_FAILED, "Generation service health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(AppError::new(
                codes::AI_REQUEST_FAILED,
                "Generation service health check failed",
            )
            .with_details(format!("status={status}"))),
            Err(e) => Err(AppError::new(
                codes::AI_REQUEST_FAILED,
                "Failed to reach the generation service",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}
