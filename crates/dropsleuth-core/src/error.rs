/// Error type shared by every core module.
///
/// Traversal failures are reported per branch and then aggregated by the
/// configured [`FailurePolicy`](crate::settings::FailurePolicy), so the
/// variants carry the in-drop path of the entry that failed.
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DropError>;

#[derive(Debug, thiserror::Error)]
pub enum DropError {
    /// No target on the surface matches the selector passed to `attach`.
    #[error("no drop target matches selector `{selector}`")]
    TargetNotFound { selector: String },

    /// A directory could not be opened or one of its pages could not be read.
    #[error("failed to read directory `{path}`: {source}")]
    ReadDir {
        path: String,
        source: std::io::Error,
    },

    /// A file handle could not be resolved (e.g. metadata failed).
    #[error("failed to read file `{path}`: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read settings from {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    SettingsInvalid(String),

    #[error("failed to serialize settings for {path}: {source}")]
    SettingsSerialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings to {path}: {source}")]
    SettingsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The background resolver thread could not be started.
    #[error("failed to start drop resolver: {0}")]
    Spawn(std::io::Error),

    #[error("export failed: {0}")]
    Export(String),
}

impl DropError {
    /// The in-drop path of the entry that failed, for traversal errors.
    pub fn entry_path(&self) -> Option<&str> {
        match self {
            Self::ReadDir { path, .. } | Self::ReadFile { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Replace the path of a traversal error with its in-drop path.
    /// Other variants are returned unchanged.
    pub(crate) fn at_entry_path(self, entry_path: String) -> Self {
        match self {
            Self::ReadDir { source, .. } => Self::ReadDir {
                path: entry_path,
                source,
            },
            Self::ReadFile { source, .. } => Self::ReadFile {
                path: entry_path,
                source,
            },
            other => other,
        }
    }
}

impl From<csv::Error> for DropError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<serde_json::Error> for DropError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_path_only_for_traversal_errors() {
        let err = DropError::ReadDir {
            path: "/A/B".into(),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(err.entry_path(), Some("/A/B"));
        assert!(err.to_string().contains("/A/B"));

        let err = DropError::TargetNotFound {
            selector: "#zone".into(),
        };
        assert_eq!(err.entry_path(), None);
        assert_eq!(err.to_string(), "no drop target matches selector `#zone`");
    }

    #[test]
    fn at_entry_path_rewrites_only_traversal_errors() {
        let err = DropError::ReadFile {
            path: "/tmp/native/B".into(),
            source: std::io::Error::other("gone"),
        }
        .at_entry_path("/A/B".into());
        assert_eq!(err.entry_path(), Some("/A/B"));
        assert!(err.to_string().ends_with("gone"));

        let err = DropError::Spawn(std::io::Error::other("no threads")).at_entry_path("/A".into());
        assert_eq!(err.entry_path(), None);
        assert_eq!(err.to_string(), "failed to start drop resolver: no threads");
    }
}
