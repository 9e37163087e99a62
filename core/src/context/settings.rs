//! Analyzer settings.
//!
//! Persisted with confy under the platform config directory
//! (`throughput/settings.toml`); every field can be overridden by the caller
//! before a session is built.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchMode;

pub const APP_NAME: &str = "throughput";
const SETTINGS_NAME: &str = "settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// How handler failures are treated during replay
    pub dispatch_mode: DispatchMode,

    /// Skip events whose timestamp goes backwards instead of replaying them
    pub reject_out_of_order: bool,

    /// Extra cooldown definition files (TOML) merged into the selected spec
    pub definition_files: Vec<PathBuf>,

    /// Use `,` as the decimal separator in formatted report text
    pub european_number_format: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Isolate,
            reject_out_of_order: true,
            definition_files: Vec::new(),
            european_number_format: false,
        }
    }
}

impl AnalyzerSettings {
    /// Load persisted settings, falling back to defaults if none exist yet.
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, SETTINGS_NAME)
    }

    /// Load settings from an explicit file instead of the platform location.
    pub fn load_from(path: &std::path::Path) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    /// Settings used by debug tooling: stop at the first module failure.
    pub fn diagnostic() -> Self {
        Self {
            dispatch_mode: DispatchMode::FailFast,
            ..Self::default()
        }
    }
}

/// Default directory for user cooldown definition files.
pub fn default_definitions_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("definitions"))
}
