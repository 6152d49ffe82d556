use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;

use crate::error::ScrapeError;
use crate::fs_util::ensure_parent;

const FORBIDDEN_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Output tree rooted at the `--directory` argument.
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
}

impl Store {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn raw_dir(&self, year: &str) -> Utf8PathBuf {
        self.root.join("raw").join(sanitize_filename(year))
    }

    pub fn clean_dir(&self, year: &str) -> Utf8PathBuf {
        self.root.join("clean").join(sanitize_filename(year))
    }

    /// `<root>/raw/<year>/<sanitized "<year> <election> <race>">.xls`
    pub fn raw_path(&self, year: &str, election_name: &str, race_name: &str) -> Utf8PathBuf {
        let basename = sanitize_filename(&format!("{year} {election_name} {race_name}.xls"));
        self.raw_dir(year).join(basename)
    }

    /// Clean output for a raw export. The year comes from the raw file's
    /// directory, not from its contents.
    pub fn clean_path_for(&self, raw_path: &Utf8Path) -> Result<Utf8PathBuf, ScrapeError> {
        let year = raw_path
            .parent()
            .and_then(|parent| parent.file_name())
            .ok_or_else(|| ScrapeError::InvalidRawPath(raw_path.to_string()))?;
        let stem = raw_path
            .file_stem()
            .ok_or_else(|| ScrapeError::InvalidRawPath(raw_path.to_string()))?;
        Ok(self.clean_dir(year).join(format!("{stem}.tsv")))
    }

    pub fn write_raw(
        &self,
        year: &str,
        election_name: &str,
        race_name: &str,
        content: &[u8],
    ) -> Result<Utf8PathBuf, ScrapeError> {
        let path = self.raw_path(year, election_name, race_name);
        Self::write_bytes_atomic(&path, content)?;
        Ok(path)
    }

    /// Writes through a temp file in the target directory and persists it
    /// over `path`. Concurrent writers race; the last one wins.
    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), ScrapeError> {
        ensure_parent(path.as_std_path())?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or(Utf8Path::new("."));
        let mut temp = Builder::new()
            .prefix(".precinct-results")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| ScrapeError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| ScrapeError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| ScrapeError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

/// Removes `\ / * ? : " < > |`; every other character is kept as is.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|ch| !FORBIDDEN_FILENAME_CHARS.contains(ch))
        .collect()
}
