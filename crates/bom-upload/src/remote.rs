//! Contract between the sequencer and the site being uploaded to.

use std::fmt;

use bom_model::Row;

use crate::error::RemoteError;

/// Account credentials for the teams site.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Form operations offered by the remote bill-of-materials editor.
///
/// Every operation is synchronous and may fail; a failure is an ordinary
/// result, never a panic. Implementations hold one authenticated session and
/// are driven by a single caller.
pub trait RemoteForm {
    /// Authenticates the session.
    fn log_in(&mut self, credentials: &Credentials) -> Result<(), RemoteError>;

    /// Copies `base_revision` into a new snapshot named `label` and opens it for editing.
    fn create_snapshot(&mut self, base_revision: u32, label: &str) -> Result<(), RemoteError>;

    /// Adds a part under `system` / `assembly`.
    fn create_part(
        &mut self,
        row: &Row,
        system: &str,
        assembly: &str,
        upload_cost: bool,
    ) -> Result<(), RemoteError>;

    /// Selects an existing part so steps can be added to it.
    ///
    /// Returns `Ok(false)` when no part with that name exists.
    fn select_part(&mut self, name: &str) -> Result<bool, RemoteError>;

    /// Adds a step to the currently selected part.
    fn create_step(&mut self, row: &Row, upload_cost: bool) -> Result<(), RemoteError>;

    /// Ends the session.
    fn close(&mut self) -> Result<(), RemoteError> {
        Ok(())
    }

    /// Releases the session without ending it, leaving it available to the operator.
    fn detach(&mut self) {}
}
