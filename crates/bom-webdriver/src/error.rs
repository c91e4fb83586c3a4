//! Error types for the WebDriver client.

use std::time::Duration;

use thiserror::Error;

/// W3C error code for a locator that matched nothing.
pub const NO_SUCH_ELEMENT: &str = "no such element";

/// W3C error code for an element that left the DOM.
pub const STALE_ELEMENT_REFERENCE: &str = "stale element reference";

/// W3C error code for an element that cannot receive input yet.
pub const ELEMENT_NOT_INTERACTABLE: &str = "element not interactable";

/// Errors that can occur while talking to a WebDriver server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WebDriverError {
    /// Transport failure reaching the driver.
    #[error("webdriver request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The driver answered with a W3C error body.
    #[error("{error}: {message}")]
    Protocol { error: String, message: String },

    /// A polled condition did not hold within the wait bound.
    #[error("timed out after {after:?} waiting for {condition}")]
    Timeout { condition: String, after: Duration },

    /// The driver answered with something other than a W3C payload.
    #[error("unexpected webdriver response: {0}")]
    UnexpectedResponse(String),

    /// The session was already closed.
    #[error("webdriver session is closed")]
    SessionClosed,
}

impl WebDriverError {
    /// Returns true when a locator matched no element.
    #[must_use]
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Protocol { error, .. } if error == NO_SUCH_ELEMENT)
    }

    /// Returns true for errors a later poll may not see again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Protocol { error, .. }
                if error == NO_SUCH_ELEMENT
                    || error == STALE_ELEMENT_REFERENCE
                    || error == ELEMENT_NOT_INTERACTABLE
        )
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for WebDriver operations.
pub type Result<T> = std::result::Result<T, WebDriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn protocol(error: &str) -> WebDriverError {
        WebDriverError::Protocol {
            error: error.to_string(),
            message: "detail".to_string(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(protocol(NO_SUCH_ELEMENT).is_no_such_element());
        assert!(protocol(STALE_ELEMENT_REFERENCE).is_transient());
        assert!(!protocol("invalid session id").is_transient());
        assert!(!protocol("invalid session id").is_no_such_element());
    }

    #[test]
    fn test_timeout_display() {
        let err = WebDriverError::Timeout {
            condition: "url https://example.test".to_string(),
            after: Duration::from_secs(10),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "timed out after 10s waiting for url https://example.test"
        );
    }
}
