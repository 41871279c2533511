//! Session settings: where templates live and where output goes.
//!
//! # Storage layout
//!
//! ```text
//! ~/.gendoc/
//!   settings.yaml   (templates_path + output_path)
//! ```
//!
//! # API pattern
//!
//! - `load_at(path)` — explicit settings file; used in tests with `TempDir`
//! - `load()` — derives the path from `dirs::home_dir()`, delegates to `load_at`
//!
//! Every renderer scopes both roots by its own output subpath, so the html
//! renderer reads `<templates_path>/html` and writes `<output_path>/html`.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application-wide paths for one generation session.
///
/// Both paths are validated to be non-empty and absolute on construction,
/// so holders of a `Settings` never need to re-check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the template tree (templates + static assets).
    pub templates_path: PathBuf,
    /// Root of the output tree.
    pub output_path: PathBuf,
}

impl Settings {
    /// Build validated settings from explicit paths.
    pub fn new(
        templates_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let settings = Settings {
            templates_path: templates_path.into(),
            output_path: output_path.into(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file at `path`.
    ///
    /// Returns `ConfigError::NotFound` if absent and `ConfigError::Parse`
    /// (with path + line context) if malformed.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// `load_at` convenience wrapper for `~/.gendoc/settings.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&default_path()?)
    }

    /// Check both roots are non-empty absolute paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_root("templates_path", &self.templates_path)?;
        check_root("output_path", &self.output_path)
    }

    /// `<templates_path>/<subpath>`.
    pub fn template_path_for(&self, subpath: &str) -> PathBuf {
        scoped(&self.templates_path, subpath)
    }

    /// `<output_path>/<subpath>`.
    pub fn output_path_for(&self, subpath: &str) -> PathBuf {
        scoped(&self.output_path, subpath)
    }

    /// A subpath must stay inside the roots: relative, no `..`.
    pub fn validate_subpath(subpath: &str) -> Result<(), ConfigError> {
        if !is_confined(Path::new(subpath)) {
            return Err(ConfigError::InvalidSubpath {
                subpath: subpath.to_string(),
            });
        }
        Ok(())
    }
}

/// `true` if `path` is relative and has no `..`, so joining it onto a root
/// can never leave that root.
pub fn is_confined(path: &Path) -> bool {
    !path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// `<home>/.gendoc/settings.yaml` — pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".gendoc").join("settings.yaml")
}

fn default_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(default_path_at(&home))
}

fn check_root(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() || !path.is_absolute() {
        return Err(ConfigError::InvalidPath {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn scoped(root: &Path, subpath: &str) -> PathBuf {
    if subpath.is_empty() {
        root.to_path_buf()
    } else {
        root.join(subpath)
    }
}
