//! Replays a validated bill of materials into the teams site.
//!
//! [`UploadSequencer`] walks the rows in order against any [`RemoteForm`];
//! [`TeamsSite`] is the browser-driven implementation, and
//! [`upload_bill_of_materials`] wires login, snapshot creation and replay
//! together.

pub mod error;
pub mod remote;
pub mod report;
pub mod sequencer;
pub mod session;
pub mod site;

pub use error::{RemoteError, UploadError};
pub use remote::{Credentials, RemoteForm};
pub use report::{RowOutcome, RowReport, SkipReason, UploadReport};
pub use sequencer::{PartContext, SequencerState, UploadContext, UploadSequencer};
pub use session::{
    DEFAULT_SNAPSHOT_LABEL, OperatorPrompt, UploadConfig, log_in_with_retry, snapshot_label,
    upload_bill_of_materials,
};
pub use site::TeamsSite;
