//! Batch validation over an ordered row sequence.

use serde::Serialize;
use tracing::error;

use crate::error::RowError;
use crate::row::{Row, RowKind};

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// 1-based position of the row in the input sequence.
    pub position: usize,
    pub kind: RowKind,
    pub identifier: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: RowError,
}

impl RowIssue {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

fn serialize_error<S: serde::Serializer>(error: &RowError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Validates every row independently and returns one issue per invalid row, in order.
pub fn validation_issues(rows: &[Row]) -> Vec<RowIssue> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            row.validate().err().map(|error| RowIssue {
                position: index + 1,
                kind: row.kind(),
                identifier: row.identifier(),
                error,
            })
        })
        .collect()
}

/// Logs one `Error (row N): …` line per issue.
pub fn report_issues(issues: &[RowIssue]) {
    for issue in issues {
        error!(
            row = issue.position,
            identifier = %issue.identifier,
            "Error (row {}): {}",
            issue.position,
            issue.error
        );
    }
}

/// Validates the batch, logs one line per invalid row, and returns the invalid count.
///
/// Any nonzero count means the batch must not be uploaded.
pub fn validate_all(rows: &[Row]) -> usize {
    let issues = validation_issues(rows);
    report_issues(&issues);
    issues.len()
}
