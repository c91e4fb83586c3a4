use thiserror::Error;

use bom_webdriver::WebDriverError;

/// Any failure of a remote form operation.
///
/// Causes are not distinguished at this boundary: the sequencer only needs to
/// know that the operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<WebDriverError> for RemoteError {
    fn from(err: WebDriverError) -> Self {
        Self::new(err.to_string())
    }
}

/// Failures that abort an upload run before any row is replayed.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Login failed and the operator chose not to retry.
    #[error("login failed and retry was declined")]
    LoginDeclined,

    /// Reading credentials or the retry answer failed.
    #[error("failed to read operator input: {0}")]
    Prompt(#[from] std::io::Error),

    /// No remote session could be opened.
    #[error("failed to open remote session: {0}")]
    Connect(#[source] RemoteError),

    /// The working snapshot could not be created.
    #[error("failed to create snapshot '{label}' from revision {base_revision}: {source}")]
    Snapshot {
        base_revision: u32,
        label: String,
        #[source]
        source: RemoteError,
    },
}
