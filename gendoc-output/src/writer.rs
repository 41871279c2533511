//! Scoped file writer.
//!
//! ## Write protocol
//!
//! 1. Create every missing directory along the destination's parent.
//! 2. Write the content to `<path>.gendoc.tmp`.
//! 3. Rename the temporary file over the destination (atomic on POSIX).
//! 4. On any failure, remove the temporary file; the destination is either
//!    fully written or left exactly as it was.

use std::path::{Path, PathBuf};

use crate::error::{write_err, OutputError};

/// Suffix of the sibling temporary file used during a write.
pub const TMP_SUFFIX: &str = ".gendoc.tmp";

/// An I/O failure annotated with the path it happened at.
///
/// Callers decide which [`OutputError`] kind it becomes: a renderer write is
/// a `Write` error, an asset copy during provisioning is `Structural`.
#[derive(Debug)]
pub(crate) struct IoFailure {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl IoFailure {
    fn at(path: &Path, source: std::io::Error) -> Self {
        IoFailure {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `content` to `path`, creating all missing parent directories.
pub fn write_string(content: &str, path: &Path) -> Result<(), OutputError> {
    write_atomic(content.as_bytes(), path).map_err(|f| write_err(f.path, f.source))
}

/// `<path>.gendoc.tmp`
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Create `dir` and all of its parents. Succeeds if it already exists.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), IoFailure> {
    std::fs::create_dir_all(dir).map_err(|e| IoFailure::at(dir, e))
}

pub(crate) fn write_atomic(content: &[u8], path: &Path) -> Result<(), IoFailure> {
    write_atomic_with_tmp(content, path, &tmp_path_for(path))
}

fn write_atomic_with_tmp(content: &[u8], path: &Path, tmp: &Path) -> Result<(), IoFailure> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        ensure_dir(tmp_parent)?;
    }

    if let Err(e) = std::fs::write(tmp, content) {
        let _ = std::fs::remove_file(tmp);
        return Err(IoFailure::at(tmp, e));
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(IoFailure::at(path, e));
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
