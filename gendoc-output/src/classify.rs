//! Template vs. static asset classification.
//!
//! The only on-disk contract exposed to template authors: a file whose stem
//! ends with `-template` (e.g. `object-template.html`, `index-template`) is a
//! template. Everything else is a static asset copied verbatim.

use std::path::Path;

/// Marker suffix that identifies a template file stem.
pub const TEMPLATE_MARKER: &str = "-template";

/// Classification of a file found under the template root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Renderable template; registered, never copied.
    Template,
    /// Passthrough asset; copied to the mirrored output location.
    StaticAsset,
}

/// Classify a file by name. Only the final path component is considered.
pub fn classify(path: &Path) -> EntryKind {
    if is_template(path) {
        EntryKind::Template
    } else {
        EntryKind::StaticAsset
    }
}

/// `true` if the file stem is `<name>-template` with a non-empty `<name>`.
pub fn is_template(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    stem.len() > TEMPLATE_MARKER.len() && stem.ends_with(TEMPLATE_MARKER)
}
