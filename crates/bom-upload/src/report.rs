//! Per-row audit trail of an upload run.

use std::fmt;

use serde::Serialize;

use bom_model::RowKind;

/// Why a row was not uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The remote form rejected or failed the part.
    PartUploadFailed { message: String },
    /// The step has no successfully created part above it.
    NoParentPart,
    /// The parent part could not be found in the editor table.
    ParentPartNotFound { part: String },
    /// Searching for the parent part failed.
    ParentPartSearchFailed { part: String, message: String },
    /// The remote form rejected or failed the step.
    StepUploadFailed { message: String },
    /// The row fits no kind.
    InvalidRow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartUploadFailed { message } => write!(f, "part upload failed: {message}"),
            Self::NoParentPart => write!(f, "no parent part exists"),
            Self::ParentPartNotFound { part } => {
                write!(f, "unable to locate parent part '{part}'")
            }
            Self::ParentPartSearchFailed { part, message } => write!(
                f,
                "page not found while searching for parent part '{part}': {message}"
            ),
            Self::StepUploadFailed { message } => write!(f, "step upload failed: {message}"),
            Self::InvalidRow => write!(f, "invalid row"),
        }
    }
}

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// System or assembly row; context updated, nothing sent.
    ContextSet,
    Uploaded,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    /// 1-based position in the input sequence.
    pub position: usize,
    pub kind: RowKind,
    pub identifier: String,
    pub outcome: RowOutcome,
}

/// Result of replaying a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Snapshot the rows were uploaded into, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_label: Option<String>,
    pub rows: Vec<RowReport>,
}

impl UploadReport {
    pub fn uploaded_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.outcome == RowOutcome::Uploaded)
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    /// Rows that were not uploaded, in input order.
    pub fn skipped(&self) -> impl Iterator<Item = (&RowReport, &SkipReason)> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            RowOutcome::Skipped(reason) => Some((row, reason)),
            _ => None,
        })
    }

    /// Counts rows of `kind` with the given outcome class.
    pub fn count(&self, kind: RowKind, uploaded: bool) -> usize {
        self.rows
            .iter()
            .filter(|row| row.kind == kind)
            .filter(|row| (row.outcome == RowOutcome::Uploaded) == uploaded)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.skipped_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(position: usize, kind: RowKind, outcome: RowOutcome) -> RowReport {
        RowReport {
            position,
            kind,
            identifier: format!("row {position}"),
            outcome,
        }
    }

    #[test]
    fn test_counts() {
        let report = UploadReport {
            snapshot_label: None,
            rows: vec![
                row(1, RowKind::System, RowOutcome::ContextSet),
                row(2, RowKind::Part, RowOutcome::Uploaded),
                row(3, RowKind::Step, RowOutcome::Skipped(SkipReason::NoParentPart)),
                row(4, RowKind::Step, RowOutcome::Uploaded),
            ],
        };
        assert_eq!(report.uploaded_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.count(RowKind::Step, true), 1);
        assert_eq!(report.count(RowKind::Step, false), 1);
        assert!(!report.is_complete());
        let (skipped, reason) = report.skipped().next().unwrap();
        assert_eq!(skipped.position, 3);
        assert_eq!(reason.to_string(), "no parent part exists");
    }

    #[test]
    fn test_serializes_outcome_with_reason() {
        let report = row(
            5,
            RowKind::Step,
            RowOutcome::Skipped(SkipReason::ParentPartNotFound {
                part: "Hub".to_string(),
            }),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "Step");
        assert_eq!(json["outcome"]["status"], "skipped");
        assert_eq!(json["outcome"]["reason"], "parent_part_not_found");
        assert_eq!(json["outcome"]["part"], "Hub");
    }
}
