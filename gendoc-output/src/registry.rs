//! Discovered-template registry.
//!
//! Keys are template paths relative to the renderer's template root, always
//! `/`-separated and including the extension (`html/object-template.html`).
//! Iteration is in key order, so suffix lookups are reproducible.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Tera;

use crate::error::OutputError;

/// A discovered template: where it came from and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateHandle {
    /// Absolute path of the template source file.
    pub path: PathBuf,
    /// Template text as read during provisioning.
    #[serde(skip)]
    pub source: String,
}

/// Mapping from relative template key to [`TemplateHandle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateHandle>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `key` (see [`template_key`]).
    pub(crate) fn insert(&mut self, key: String, handle: TemplateHandle) {
        self.templates.insert(key, handle);
    }

    pub fn get(&self, key: &str) -> Option<&TemplateHandle> {
        self.templates.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateHandle)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// First key (in iteration order) ending with `suffix`.
    ///
    /// Useful when a renderer knows a template's file name but not the
    /// subdirectory it lives in.
    pub fn key_ending_with(&self, suffix: &str) -> Option<&str> {
        self.keys().find(|key| key.ends_with(suffix))
    }

    /// Load every registered template into a fresh [`Tera`] instance, named
    /// by its registry key. Rendering is left to the consumer.
    pub fn to_tera(&self) -> Result<Tera, OutputError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            self.templates
                .iter()
                .map(|(key, handle)| (key.as_str(), handle.source.as_str())),
        )?;
        Ok(tera)
    }
}

/// Registry key for a path relative to the template root, or `None` if any
/// component is not valid UTF-8. Lossy keys would let distinct files collide.
pub fn template_key(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
