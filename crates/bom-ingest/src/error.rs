//! Error types for bill-of-materials ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a bill of materials.
///
/// Every variant is fatal for the whole batch.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File extension is not an accepted delimited format.
    #[error("unsupported file format '{extension}' for {path}; expected .csv")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File has no header row.
    #[error("no data found in {path}")]
    NoData { path: PathBuf },

    /// Header lacks one or more required columns.
    #[error("incorrect columns in {path}; missing: {}", .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// A numeric cell could not be parsed.
    #[error("invalid {column} value '{value}' on line {line} of {path}")]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// Malformed delimited data.
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
