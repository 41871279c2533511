//! Error types for gendoc-output.

use std::path::PathBuf;

use thiserror::Error;

use gendoc_core::ConfigError;

use crate::generator::GenerationState;

/// All fatal errors that can arise from provisioning, writing, and chain runs.
///
/// Soft discovery problems are not errors; they are collected as
/// [`SkippedEntry`](crate::provision::SkippedEntry) values instead.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Invalid settings or subpath.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Mirroring the directory structure or copying a static asset failed.
    /// Remaining generation is unsafe to continue.
    #[error("failed to provision {path}: {source}")]
    Structural {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scoped write failed; the destination was left untouched.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store-dependent access before `bind`.
    #[error("generator '{generator}' is not bound to a store")]
    NotBound { generator: String },

    /// Illegal lifecycle transition.
    #[error("generator '{generator}' expected state {expected:?}, found {found:?}")]
    InvalidState {
        generator: String,
        expected: GenerationState,
        found: GenerationState,
    },

    /// A predecessor was already linked to this generator.
    #[error("generator '{generator}' already has a previous generator linked")]
    AlreadyLinked { generator: String },

    /// A generator entry point returned without binding the store first.
    #[error("generator '{generator}' returned without binding the store")]
    BindSkipped { generator: String },

    /// A generator requires its predecessor's output but none is linked.
    #[error("generator '{generator}' requires a previous generator, but none is linked")]
    MissingPrevious { generator: String },

    /// Template hand-off to tera failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Fatal error raised by a concrete generator.
    #[error("generator '{generator}' failed: {message}")]
    Generation { generator: String, message: String },
}

/// Convenience constructor for [`OutputError::Structural`].
pub(crate) fn structural_err(path: impl Into<PathBuf>, source: std::io::Error) -> OutputError {
    OutputError::Structural {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`OutputError::Write`].
pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> OutputError {
    OutputError::Write {
        path: path.into(),
        source,
    }
}
