//! End-to-end upload run: login, snapshot, replay.

use std::io;

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use bom_model::Row;

use crate::error::{RemoteError, UploadError};
use crate::remote::{Credentials, RemoteForm};
use crate::report::UploadReport;
use crate::sequencer::UploadSequencer;

/// Snapshot label used when none is configured.
pub const DEFAULT_SNAPSHOT_LABEL: &str = "Bill of Materials";

/// Settings for one upload run.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Revision the new snapshot is copied from.
    pub base_revision: u32,
    /// Label prefix; a timestamp is appended.
    pub snapshot_label: String,
    /// Whether cost and carbon fields are filled in.
    pub upload_cost: bool,
    /// Leave the remote session open after the run.
    pub keep_open: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_revision: 1,
            snapshot_label: DEFAULT_SNAPSHOT_LABEL.to_string(),
            upload_cost: true,
            keep_open: false,
        }
    }
}

impl UploadConfig {
    #[must_use]
    pub fn with_base_revision(mut self, revision: u32) -> Self {
        self.base_revision = revision;
        self
    }

    #[must_use]
    pub fn with_snapshot_label(mut self, label: impl Into<String>) -> Self {
        self.snapshot_label = label.into();
        self
    }

    #[must_use]
    pub fn with_upload_cost(mut self, enable: bool) -> Self {
        self.upload_cost = enable;
        self
    }

    #[must_use]
    pub fn with_keep_open(mut self, enable: bool) -> Self {
        self.keep_open = enable;
        self
    }
}

/// Interaction with the person running the upload.
pub trait OperatorPrompt {
    /// Asks for site credentials.
    fn credentials(&mut self) -> io::Result<Credentials>;

    /// Asks whether to try logging in again after a failure.
    fn confirm_retry(&mut self) -> io::Result<bool>;
}

/// Builds the full snapshot label, e.g. `Bill of Materials (05 Mar 25 14:07)`.
pub fn snapshot_label(prefix: &str, at: DateTime<Local>) -> String {
    format!("{prefix} ({})", at.format("%d %b %y %H:%M"))
}

/// Opens a form and logs in, asking the operator to retry after each failure.
///
/// Every attempt gets a fresh form from `connect`; a form whose login failed
/// is closed before the operator is asked.
///
/// # Errors
///
/// Returns [`UploadError::LoginDeclined`] (or [`UploadError::Connect`] when no
/// form could be opened) once the operator declines to retry.
pub fn log_in_with_retry<F, C, P>(mut connect: C, prompt: &mut P) -> Result<F, UploadError>
where
    F: RemoteForm,
    C: FnMut() -> Result<F, RemoteError>,
    P: OperatorPrompt + ?Sized,
{
    loop {
        let credentials = prompt.credentials()?;
        info!(username = %credentials.username, "attempting to log into account");

        let failure = match connect() {
            Ok(mut form) => match form.log_in(&credentials) {
                Ok(()) => {
                    info!("login successful");
                    return Ok(form);
                }
                Err(err) => {
                    error!(error = %err, "login failed: invalid credentials");
                    if let Err(close_err) = form.close() {
                        warn!(error = %close_err, "failed to close session after login failure");
                    }
                    UploadError::LoginDeclined
                }
            },
            Err(err) => {
                error!(error = %err, "failed to open remote session");
                UploadError::Connect(err)
            }
        };

        if !prompt.confirm_retry()? {
            return Err(failure);
        }
    }
}

/// Logs in, creates a snapshot, and replays `rows` into it.
///
/// `rows` must already have passed validation. Individual part and step
/// failures are recorded in the report; only login and snapshot failures
/// abort the run.
///
/// # Errors
///
/// See [`log_in_with_retry`] and [`UploadError::Snapshot`].
pub fn upload_bill_of_materials<F, C, P>(
    rows: &[Row],
    config: &UploadConfig,
    connect: C,
    prompt: &mut P,
) -> Result<UploadReport, UploadError>
where
    F: RemoteForm,
    C: FnMut() -> Result<F, RemoteError>,
    P: OperatorPrompt + ?Sized,
{
    let mut form = log_in_with_retry(connect, prompt)?;

    let label = snapshot_label(&config.snapshot_label, Local::now());
    info!(
        base_revision = config.base_revision,
        "creating new snapshot '{label}' from base revision {}", config.base_revision
    );
    if let Err(source) = form.create_snapshot(config.base_revision, &label) {
        close_form(&mut form, config);
        return Err(UploadError::Snapshot {
            base_revision: config.base_revision,
            label,
            source,
        });
    }

    info!(rows = rows.len(), "uploading bill of materials");
    let mut report = UploadSequencer::new(&mut form, config.upload_cost).run(rows);
    report.snapshot_label = Some(label);
    info!(
        uploaded = report.uploaded_count(),
        skipped = report.skipped_count(),
        "Bill of materials uploaded successfully."
    );

    close_form(&mut form, config);
    Ok(report)
}

fn close_form<F: RemoteForm>(form: &mut F, config: &UploadConfig) {
    if config.keep_open {
        info!("leaving remote session open");
        form.detach();
        return;
    }
    if let Err(err) = form.close() {
        warn!(error = %err, "failed to close remote session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_label_format() {
        let at = Local.with_ymd_and_hms(2025, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(
            snapshot_label("Bill of Materials", at),
            "Bill of Materials (05 Mar 25 14:07)"
        );
    }

    #[test]
    fn test_config_builders() {
        let config = UploadConfig::default()
            .with_base_revision(3)
            .with_snapshot_label("Final")
            .with_upload_cost(false)
            .with_keep_open(true);
        assert_eq!(config.base_revision, 3);
        assert_eq!(config.snapshot_label, "Final");
        assert!(!config.upload_cost);
        assert!(config.keep_open);
    }
}
