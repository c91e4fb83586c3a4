//! Minimal blocking client for the W3C WebDriver protocol.
//!
//! Covers only what form-driven uploads need: navigation, element lookup,
//! clicks, typing, and bounded waits for elements and URLs. Talk to a running
//! geckodriver or chromedriver at [`DriverConfig::server_url`].

pub mod config;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod wait;

pub use config::{
    Browser, DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL, DEFAULT_WAIT_TIMEOUT, DriverConfig,
};
pub use driver::WebDriver;
pub use error::{Result, WebDriverError};
pub use protocol::{Element, Locator};
pub use wait::{Condition, poll_until};
