//! Stateful replay of an ordered row sequence against a [`RemoteForm`].
//!
//! The hierarchy is implicit in row order: a system row sets the system for
//! every following part until the next system row, likewise for assemblies,
//! and a part row becomes the parent of the steps that follow it. A failed
//! part never aborts the run; it only causes its own steps to be skipped.

use tracing::{error, info, info_span, warn};

use bom_model::{Row, RowKind};

use crate::remote::RemoteForm;
use crate::report::{RowOutcome, RowReport, SkipReason, UploadReport};

/// Last part row seen by the sequencer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PartContext {
    #[default]
    None,
    /// Created remotely; steps attach to it.
    Created(String),
    /// Upload failed; steps below it are skipped.
    Failed(String),
}

/// Coarse state of the sequencer, derived from its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    NoContext,
    HasSystemOrAssembly,
    HasPart,
    PartMissing,
}

/// Running context carried from row to row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadContext {
    pub current_system: String,
    pub current_assembly: String,
    pub current_part: PartContext,
}

impl UploadContext {
    pub fn state(&self) -> SequencerState {
        match &self.current_part {
            PartContext::Created(_) => SequencerState::HasPart,
            PartContext::Failed(_) => SequencerState::PartMissing,
            PartContext::None
                if self.current_system.is_empty() && self.current_assembly.is_empty() =>
            {
                SequencerState::NoContext
            }
            PartContext::None => SequencerState::HasSystemOrAssembly,
        }
    }
}

/// Replays rows one at a time against a single remote form.
pub struct UploadSequencer<'f, F: RemoteForm + ?Sized> {
    form: &'f mut F,
    upload_cost: bool,
    context: UploadContext,
}

impl<'f, F: RemoteForm + ?Sized> UploadSequencer<'f, F> {
    pub fn new(form: &'f mut F, upload_cost: bool) -> Self {
        Self {
            form,
            upload_cost,
            context: UploadContext::default(),
        }
    }

    pub fn context(&self) -> &UploadContext {
        &self.context
    }

    /// Processes every row in order and reports the outcome of each.
    ///
    /// The context is reset at the start of each run.
    pub fn run(&mut self, rows: &[Row]) -> UploadReport {
        self.context = UploadContext::default();
        let total = rows.len();
        let mut report = UploadReport::default();
        for (index, row) in rows.iter().enumerate() {
            report.rows.push(self.process(index + 1, total, row));
        }
        report
    }

    fn process(&mut self, position: usize, total: usize, row: &Row) -> RowReport {
        let identifier = row.identifier();
        let span = info_span!("row", position, kind = %row.kind());
        let _guard = span.enter();
        info!(
            "({position}/{total}) Uploading {} '{identifier}'...",
            row.kind().as_str().to_lowercase()
        );

        let outcome = match row.kind() {
            RowKind::System => {
                self.context.current_system = row.system().to_string();
                RowOutcome::ContextSet
            }
            RowKind::Assembly => {
                self.context.current_assembly = row.assembly().to_string();
                RowOutcome::ContextSet
            }
            RowKind::Part => self.upload_part(row),
            RowKind::Step => self.upload_step(row),
            RowKind::Undefined => {
                warn!("row has no system, assembly, part, or step type");
                RowOutcome::Skipped(SkipReason::InvalidRow)
            }
        };

        if let RowOutcome::Skipped(reason) = &outcome {
            error!(
                "Error (row {position}): Unable to upload {} '{identifier}'; {reason}",
                row.kind().as_str().to_lowercase()
            );
        }
        RowReport {
            position,
            kind: row.kind(),
            identifier,
            outcome,
        }
    }

    fn upload_part(&mut self, row: &Row) -> RowOutcome {
        let result = self.form.create_part(
            row,
            &self.context.current_system,
            &self.context.current_assembly,
            self.upload_cost,
        );
        match result {
            Ok(()) => {
                self.context.current_part = PartContext::Created(row.part().to_string());
                RowOutcome::Uploaded
            }
            Err(err) => {
                self.context.current_part = PartContext::Failed(row.part().to_string());
                RowOutcome::Skipped(SkipReason::PartUploadFailed {
                    message: err.to_string(),
                })
            }
        }
    }

    fn upload_step(&mut self, row: &Row) -> RowOutcome {
        let PartContext::Created(part) = &self.context.current_part else {
            return RowOutcome::Skipped(SkipReason::NoParentPart);
        };
        match self.form.select_part(part) {
            Ok(true) => {}
            Ok(false) => {
                return RowOutcome::Skipped(SkipReason::ParentPartNotFound { part: part.clone() });
            }
            Err(err) => {
                return RowOutcome::Skipped(SkipReason::ParentPartSearchFailed {
                    part: part.clone(),
                    message: err.to_string(),
                });
            }
        }
        match self.form.create_step(row, self.upload_cost) {
            Ok(()) => RowOutcome::Uploaded,
            Err(err) => RowOutcome::Skipped(SkipReason::StepUploadFailed {
                message: err.to_string(),
            }),
        }
    }
}
