/// Drop behaviour configuration.
///
/// Stored as JSON. Every field has a default, so a settings file only needs
/// the keys it overrides:
///
/// ```json
/// { "failure_policy": "best_effort", "skip_hidden": true }
/// ```
use crate::error::{DropError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable naming the settings file.
pub const SETTINGS_ENV_VAR: &str = "DROPSLEUTH_SETTINGS";

/// How traversal errors from individual branches are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing branch fails the whole drop.
    #[default]
    FailFast,
    /// Failing branches are dropped and reported alongside the files of
    /// every branch that succeeded.
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropSettings {
    /// Class toggled on the target while a drag hovers it.
    pub active_class: String,
    /// Leading-edge throttle window for drag-over feedback.
    pub throttle_ms: u64,
    /// Idle time after the last feedback pulse before the class is removed.
    pub decay_ms: u64,
    /// Batch size for native directory readers.
    pub page_size: usize,
    pub failure_policy: FailurePolicy,
    /// Skip dot-files and OS metadata files found inside dropped folders.
    pub skip_hidden: bool,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            active_class: "drag".to_string(),
            throttle_ms: 100,
            decay_ms: 150,
            page_size: crate::entry::fs::DEFAULT_PAGE_SIZE,
            failure_policy: FailurePolicy::FailFast,
            skip_hidden: false,
        }
    }
}

impl DropSettings {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn decay(&self) -> Duration {
        Duration::from_millis(self.decay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.active_class.trim().is_empty() {
            return Err(DropError::SettingsInvalid(
                "active_class must not be empty".into(),
            ));
        }
        if self.active_class.contains(char::is_whitespace) {
            return Err(DropError::SettingsInvalid(format!(
                "active_class `{}` must be a single class name",
                self.active_class
            )));
        }
        if self.page_size == 0 {
            return Err(DropError::SettingsInvalid(
                "page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DropError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&text).map_err(|source| DropError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| {
            DropError::SettingsSerialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, text).map_err(|source| DropError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the file named by [`SETTINGS_ENV_VAR`].
    ///
    /// Falls back to defaults when the variable is unset or the file does
    /// not exist. A file that exists but does not parse is an error.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(SETTINGS_ENV_VAR) {
            Some(path) => Self::load_or_default(&PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Like [`load`](Self::load) but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No settings at {} -- using defaults", path.display());
            return Ok(Self::default());
        }
        let settings = Self::load(path)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
