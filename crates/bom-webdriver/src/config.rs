//! Connection and wait settings for a WebDriver session.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default geckodriver / chromedriver endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4444";

/// Default bound for every element or URL wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between polls of a wait condition.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// HTTP timeout for a single driver command.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Browser requested from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    #[default]
    Firefox,
    Chrome,
}

impl Browser {
    /// W3C `browserName` capability value.
    #[must_use]
    pub const fn capability_name(&self) -> &'static str {
        match self {
            Self::Firefox => "firefox",
            Self::Chrome => "chrome",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capability_name())
    }
}

/// Settings for a WebDriver session.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Base URL of the driver server.
    pub server_url: String,
    pub browser: Browser,
    /// Run without a visible window.
    pub headless: bool,
    /// Upper bound for each wait.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            browser: Browser::default(),
            headless: false,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }
}
