use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScrapeError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("no election category or year selected")]
    EmptySelection,

    #[error("invalid district pattern: {0}")]
    InvalidPattern(String),

    #[error("request failed: {0}")]
    Http(String),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("election link has no election id: {0}")]
    MissingElectionId(String),

    #[error("election link text has no year: {0:?}")]
    MissingElectionYear(String),

    #[error("no race selector on election page {0}")]
    MissingRaceSelector(String),

    #[error("{0}: export contains no ward tables")]
    NoWardTables(String),

    #[error("{file}: table {table} has no ward marker")]
    MissingWardMarker { file: String, table: usize },

    #[error("{file}: ward {ward} table has no header row")]
    MissingHeaderRow { file: String, ward: u32 },

    #[error("{file}: ward {ward} table has no Precinct column")]
    MissingPrecinctColumn { file: String, ward: u32 },

    #[error("{file}: ward {ward} has unparseable precinct {value:?}")]
    InvalidPrecinct {
        file: String,
        ward: u32,
        value: String,
    },

    #[error("ward {ward} precinct {precinct} does not fit a 5-character precinct code")]
    PrecinctOutOfRange { ward: u32, precinct: u32 },

    #[error("{file}: ward {ward} has a % column at position {index} with nothing to pair")]
    AmbiguousPercentColumn {
        file: String,
        ward: u32,
        index: usize,
    },

    #[error("header {0:?} is not valid legacy-encoded text")]
    HeaderEncoding(String),

    #[error("raw export path has no year directory: {0}")]
    InvalidRawPath(String),

    #[error("failed to write TSV: {0}")]
    Tsv(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ScrapeError {
    /// Errors raised while reading a malformed export file.
    pub fn is_malformed_export(&self) -> bool {
        matches!(
            self,
            ScrapeError::NoWardTables(_)
                | ScrapeError::MissingWardMarker { .. }
                | ScrapeError::MissingHeaderRow { .. }
                | ScrapeError::MissingPrecinctColumn { .. }
                | ScrapeError::InvalidPrecinct { .. }
                | ScrapeError::PrecinctOutOfRange { .. }
                | ScrapeError::AmbiguousPercentColumn { .. }
                | ScrapeError::HeaderEncoding(_)
        )
    }
}
