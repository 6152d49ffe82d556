use std::fs;
use std::path::Path;

use crate::error::ScrapeError;

/// Creates `dir` and its parents. Losing a creation race to another process
/// is fine as long as the directory exists afterwards.
pub fn ensure_dir(dir: &Path) -> Result<(), ScrapeError> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(_) if dir.is_dir() => Ok(()),
        Err(err) => Err(ScrapeError::Filesystem(format!(
            "create {}: {err}",
            dir.display()
        ))),
    }
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent(path: &Path) -> Result<(), ScrapeError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
