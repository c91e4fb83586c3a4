//! Bounded polling for page-state preconditions.

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Result, WebDriverError};

/// Condition an element must satisfy before a wait returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Present in the DOM.
    Present,
    /// Displayed and enabled.
    Clickable,
}

/// Calls `check` until it yields a value or `timeout` elapses.
///
/// `Ok(None)` and transient driver errors (missing or stale elements) are
/// retried after `interval`; any other error is returned immediately.
///
/// # Errors
///
/// Returns [`WebDriverError::Timeout`] naming `condition` when the bound is hit.
pub fn poll_until<T, F>(
    timeout: Duration,
    interval: Duration,
    condition: &str,
    mut check: F,
) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    let start = Instant::now();
    loop {
        match check() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(err) if err.is_transient() => {
                trace!(condition, error = %err, "transient error while polling");
            }
            Err(err) => return Err(err),
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(WebDriverError::Timeout {
                condition: condition.to_string(),
                after: timeout,
            });
        }
        thread::sleep(interval.min(timeout - elapsed));
    }
}
