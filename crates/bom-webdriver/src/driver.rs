//! Blocking WebDriver session.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::config::DriverConfig;
use crate::error::{Result, WebDriverError};
use crate::protocol::{Element, Locator, new_session_body, parse_response, session_id};
use crate::wait::{Condition, poll_until};

/// One browser session driven over HTTP.
///
/// The session is deleted on [`WebDriver::quit`] or, failing that, on drop.
pub struct WebDriver {
    /// HTTP client.
    client: Client,
    /// Driver base URL without trailing slash.
    server_url: String,
    /// `None` once the session has been deleted.
    session_id: Option<String>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl WebDriver {
    /// Starts a new browser session.
    ///
    /// # Errors
    ///
    /// Fails when the driver is unreachable or refuses the capabilities.
    pub fn connect(config: &DriverConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let server_url = config.server_url.trim_end_matches('/').to_string();
        debug!(server_url = %server_url, browser = %config.browser, "starting webdriver session");

        let response = client
            .post(format!("{server_url}/session"))
            .json(&new_session_body(config))
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        let id = session_id(&parse_response(status, &body)?)?;
        debug!(session_id = %id, "webdriver session started");

        Ok(Self {
            client,
            server_url,
            session_id: Some(id),
            wait_timeout: config.wait_timeout,
            poll_interval: config.poll_interval,
        })
    }

    fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let id = self.session_id.as_deref().ok_or(WebDriverError::SessionClosed)?;
        let url = format!("{}/session/{id}{path}", self.server_url);
        trace!(%method, url = %url, "webdriver command");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        parse_response(status, &text)
    }

    fn get(&self, path: &str) -> Result<Value> {
        self.command(Method::GET, path, None)
    }

    fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.command(Method::POST, path, Some(body))
    }

    // === Navigation ===

    /// Loads `url` in the current tab.
    pub fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        self.post("/url", json!({ "url": url }))?;
        Ok(())
    }

    pub fn current_url(&self) -> Result<String> {
        let value = self.get("/url")?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("url was {value}")))
    }

    // === Element lookup ===

    /// Finds the first element matching `locator`, without waiting.
    pub fn find(&self, locator: &Locator) -> Result<Element> {
        Element::from_value(&self.post("/element", locator.to_json())?)
    }

    /// Finds the first descendant of `parent` matching `locator`.
    pub fn find_in(&self, parent: &Element, locator: &Locator) -> Result<Element> {
        let path = format!("/element/{}/element", parent.id());
        Element::from_value(&self.post(&path, locator.to_json())?)
    }

    pub fn find_all_in(&self, parent: &Element, locator: &Locator) -> Result<Vec<Element>> {
        let path = format!("/element/{}/elements", parent.id());
        Element::list_from_value(&self.post(&path, locator.to_json())?)
    }

    // === Element interaction ===

    pub fn click_element(&self, element: &Element) -> Result<()> {
        self.post(&format!("/element/{}/click", element.id()), json!({}))?;
        Ok(())
    }

    pub fn clear_element(&self, element: &Element) -> Result<()> {
        self.post(&format!("/element/{}/clear", element.id()), json!({}))?;
        Ok(())
    }

    pub fn type_into(&self, element: &Element, text: &str) -> Result<()> {
        self.post(
            &format!("/element/{}/value", element.id()),
            json!({ "text": text }),
        )?;
        Ok(())
    }

    pub fn element_text(&self, element: &Element) -> Result<String> {
        let value = self.get(&format!("/element/{}/text", element.id()))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub fn is_displayed(&self, element: &Element) -> Result<bool> {
        let value = self.get(&format!("/element/{}/displayed", element.id()))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub fn is_enabled(&self, element: &Element) -> Result<bool> {
        let value = self.get(&format!("/element/{}/enabled", element.id()))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    // === Waits ===

    /// Waits until `locator` matches an element satisfying `condition`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError::Timeout`] after the configured wait bound.
    pub fn wait_for_element(&self, locator: &Locator, condition: Condition) -> Result<Element> {
        let description = match condition {
            Condition::Present => format!("presence of {locator}"),
            Condition::Clickable => format!("{locator} to be clickable"),
        };
        poll_until(self.wait_timeout, self.poll_interval, &description, || {
            let element = self.find(locator)?;
            match condition {
                Condition::Present => Ok(Some(element)),
                Condition::Clickable => {
                    let ready = self.is_displayed(&element)? && self.is_enabled(&element)?;
                    Ok(ready.then_some(element))
                }
            }
        })
    }

    /// Waits until the current URL equals `url`.
    pub fn wait_for_url(&self, url: &str) -> Result<()> {
        poll_until(
            self.wait_timeout,
            self.poll_interval,
            &format!("url {url}"),
            || Ok((self.current_url()? == url).then_some(())),
        )
    }

    /// Waits for `locator` to become clickable, then clicks it.
    pub fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.wait_for_element(locator, Condition::Clickable)?;
        self.click_element(&element)
    }

    /// Waits for `locator` to become clickable, optionally clears it, then types `text`.
    ///
    /// An empty `text` leaves the field untouched apart from the clear.
    pub fn send_keys(&self, locator: &Locator, text: &str, clear: bool) -> Result<()> {
        let element = self.wait_for_element(locator, Condition::Clickable)?;
        if clear {
            self.clear_element(&element)?;
        }
        if text.is_empty() {
            return Ok(());
        }
        self.type_into(&element, text)
    }

    /// Deletes the session. Calling it again is a no-op.
    pub fn quit(&mut self) -> Result<()> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };
        debug!(session_id = %id, "closing webdriver session");
        let response = self
            .client
            .delete(format!("{}/session/{id}", self.server_url))
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        parse_response(status, &body)?;
        Ok(())
    }

    /// Forgets the session so the browser window stays open after drop.
    pub fn detach(&mut self) {
        if let Some(id) = self.session_id.take() {
            debug!(session_id = %id, "leaving webdriver session open");
        }
    }
}

impl Drop for WebDriver {
    fn drop(&mut self) {
        if let Err(error) = self.quit() {
            warn!(%error, "failed to close webdriver session");
        }
    }
}
