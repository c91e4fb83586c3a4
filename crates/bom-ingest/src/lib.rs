//! Bill-of-materials ingestion.
//!
//! Reads a delimited file whose header is a superset of [`REQUIRED_FIELDS`]
//! and turns each record into a classified [`bom_model::Row`].

pub mod error;
pub mod reader;

use std::path::Path;

use tracing::info;

use bom_model::{Row, RowIssue, RowKind, validate_all, validation_issues};

pub use error::{IngestError, Result};
pub use reader::{
    DEFAULT_DELIMITER, IngestOptions, REQUIRED_FIELDS, SUPPORTED_EXTENSIONS, check_extension,
    load_rows, read_rows,
};

/// Rows loaded from a file together with their validation issues.
#[derive(Debug, Clone)]
pub struct LoadedBatch {
    pub rows: Vec<Row>,
    pub issues: Vec<RowIssue>,
}

impl LoadedBatch {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    /// Number of rows of the given kind.
    pub fn count_kind(&self, kind: RowKind) -> usize {
        self.rows.iter().filter(|row| row.kind() == kind).count()
    }
}

/// Loads `path` and validates every row.
///
/// Each invalid row is logged; whether the batch may proceed is left to the
/// caller via [`LoadedBatch::is_valid`].
///
/// # Errors
///
/// Returns an [`IngestError`] when the file itself cannot be loaded.
pub fn load_and_validate(path: &Path, options: &IngestOptions) -> Result<LoadedBatch> {
    let rows = load_rows(path, options)?;
    info!("validating data");
    let issues = if validate_all(&rows) == 0 {
        info!("successfully validated data");
        Vec::new()
    } else {
        validation_issues(&rows)
    };
    Ok(LoadedBatch { rows, issues })
}
