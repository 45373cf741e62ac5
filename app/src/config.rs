use std::path::PathBuf;

use cpr_ai::gemini::GeminiConfig;
use cpr_core::layout::PageLayout;

/// How `Generate` actions are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// On a spawned worker thread; the session stays usable meanwhile.
    Background,
    /// On the calling thread, before the command returns.
    Inline,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub export_dir: PathBuf,
    pub layout: PageLayout,
    pub generation_mode: GenerationMode,
}

impl AppConfig {
    /// Credential from the environment, default endpoint and page layout, background generation.
    pub fn from_env(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            gemini: GeminiConfig::from_env(),
            export_dir: export_dir.into(),
            layout: PageLayout::default(),
            generation_mode: GenerationMode::Background,
        }
    }
}
