//! Error types for gendoc-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the settings file.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings file did not exist at the expected path.
    #[error("settings not found at {path}")]
    NotFound { path: PathBuf },

    /// A required path is empty or not absolute.
    #[error("invalid {field}: '{}' must be a non-empty absolute path", path.display())]
    InvalidPath { field: &'static str, path: PathBuf },

    /// A renderer output subpath escapes its root or is absolute.
    #[error("invalid output subpath '{subpath}': must be relative and must not contain '..'")]
    InvalidSubpath { subpath: String },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.gendoc/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
