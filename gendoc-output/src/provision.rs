//! Template provisioning: mirror the template tree into the output tree.
//!
//! For every entry below the template root:
//!
//! | Entry                  | Action                                          |
//! |------------------------|-------------------------------------------------|
//! | directory              | create the mirrored directory (idempotent)      |
//! | static asset           | copy verbatim, skipped when content is identical |
//! | template               | register in the [`TemplateRegistry`], never copy |
//!
//! # Failure classes
//!
//! Creating a mirrored directory or writing a static asset is *structural*:
//! the run aborts with [`OutputError::Structural`]. Everything that only
//! affects a single discovered entry (unreadable walk entry, source that
//! vanished, template that is not UTF-8 text, stale template copy that cannot
//! be cleared) is *soft*: it is logged, recorded as a [`SkippedEntry`], and
//! the run continues.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::classify::{classify, EntryKind};
use crate::error::{structural_err, OutputError};
use crate::registry::{template_key, TemplateHandle, TemplateRegistry};
use crate::writer::{ensure_dir, write_atomic};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Outcome of provisioning a single static asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetCopy {
    /// Asset was written (new, or content differed).
    Copied { path: PathBuf },
    /// Destination already held identical content and was left untouched.
    Unchanged { path: PathBuf },
}

impl AssetCopy {
    pub fn path(&self) -> &Path {
        match self {
            AssetCopy::Copied { path } | AssetCopy::Unchanged { path } => path,
        }
    }
}

/// A soft discovery error: the entry was skipped, provisioning continued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a provisioning run found and did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    pub registry: TemplateRegistry,
    pub assets: Vec<AssetCopy>,
    /// Number of mirrored directories ensured below the output root.
    pub directories: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl ProvisionReport {
    pub fn copied(&self) -> usize {
        self.assets
            .iter()
            .filter(|a| matches!(a, AssetCopy::Copied { .. }))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.assets.len() - self.copied()
    }

    fn skip(&mut self, path: &Path, reason: impl ToString) {
        let reason = reason.to_string();
        tracing::warn!(path = %path.display(), reason = %reason, "skipping template entry");
        self.skipped.push(SkippedEntry {
            path: path.to_path_buf(),
            reason,
        });
    }
}

// ---------------------------------------------------------------------------
// provision
// ---------------------------------------------------------------------------

/// Copy static assets from `template_root` to `output_root`, replicating the
/// directory structure, and register every template found.
///
/// A missing `template_root` yields an empty report. Safe to run repeatedly:
/// unchanged inputs produce an identical registry and leave copied assets
/// untouched.
pub fn provision(template_root: &Path, output_root: &Path) -> Result<ProvisionReport, OutputError> {
    let mut report = ProvisionReport::default();

    match std::fs::metadata(template_root) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(root = %template_root.display(), "no template root; nothing to provision");
            return Ok(report);
        }
        Err(e) => return Err(structural_err(template_root, e)),
        Ok(meta) if !meta.is_dir() => {
            return Err(structural_err(
                template_root,
                std::io::Error::new(ErrorKind::Other, "template root is not a directory"),
            ));
        }
        Ok(_) => {}
    }

    ensure_dir(output_root).map_err(|f| structural_err(f.path, f.source))?;

    // An output root inside the template root must not be walked as input.
    let nested = output_root != template_root && output_root.starts_with(template_root);
    let walker = WalkDir::new(template_root)
        .follow_links(true)
        .sort_by_file_name()
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !(nested && e.path().starts_with(output_root)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(template_root).to_path_buf();
                if err.depth() == 0 {
                    return Err(structural_err(path, err.into()));
                }
                report.skip(&path, &err);
                continue;
            }
        };

        let source = entry.path();
        let Ok(relative) = source.strip_prefix(template_root) else {
            report.skip(source, "entry is outside the template root");
            continue;
        };
        let target = output_root.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target).map_err(|f| structural_err(f.path, f.source))?;
            report.directories += 1;
            continue;
        }
        if !entry.file_type().is_file() {
            report.skip(source, "not a regular file");
            continue;
        }

        match classify(relative) {
            EntryKind::Template => register_template(&mut report, source, relative, &target),
            EntryKind::StaticAsset => copy_asset(&mut report, source, &target)?,
        }
    }

    tracing::info!(
        templates = report.registry.len(),
        copied = report.copied(),
        unchanged = report.unchanged(),
        skipped = report.skipped.len(),
        root = %template_root.display(),
        "provisioned templates"
    );
    Ok(report)
}

fn register_template(report: &mut ProvisionReport, source: &Path, relative: &Path, target: &Path) {
    // A template copied by an older run must not linger in the output tree.
    if target.is_file() {
        if let Err(e) = std::fs::remove_file(target) {
            report.skip(target, format!("cannot clear stale template copy: {e}"));
        }
    }

    let Some(key) = template_key(relative) else {
        report.skip(source, "template path is not valid UTF-8");
        return;
    };

    match std::fs::read_to_string(source) {
        Ok(text) => {
            tracing::debug!(template = %key, "registered template");
            report.registry.insert(
                key,
                TemplateHandle {
                    path: source.to_path_buf(),
                    source: text,
                },
            );
        }
        Err(e) => report.skip(source, format!("cannot read template: {e}")),
    }
}

fn copy_asset(report: &mut ProvisionReport, source: &Path, target: &Path) -> Result<(), OutputError> {
    let bytes = match std::fs::read(source) {
        Ok(bytes) => bytes,
        Err(e) => {
            report.skip(source, format!("cannot read static asset: {e}"));
            return Ok(());
        }
    };

    if let Ok(existing) = std::fs::read(target) {
        if digest(&existing) == digest(&bytes) {
            tracing::debug!(path = %target.display(), "unchanged");
            report.assets.push(AssetCopy::Unchanged {
                path: target.to_path_buf(),
            });
            return Ok(());
        }
    }

    write_atomic(&bytes, target).map_err(|f| structural_err(f.path, f.source))?;
    tracing::debug!(path = %target.display(), "copied");
    report.assets.push(AssetCopy::Copied {
        path: target.to_path_buf(),
    });
    Ok(())
}

fn digest(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
