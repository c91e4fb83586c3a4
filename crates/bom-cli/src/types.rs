use bom_ingest::LoadedBatch;
use bom_upload::UploadReport;

/// How an `upload` invocation ended.
#[derive(Debug)]
pub enum UploadRun {
    /// Validation failed; nothing was sent.
    Rejected(LoadedBatch),
    Completed {
        batch: LoadedBatch,
        report: UploadReport,
    },
}
