//! W3C WebDriver wire format.
//!
//! Every response body is `{"value": ...}`; failures carry
//! `{"value": {"error": "<code>", "message": "..."}}`.

use std::fmt;

use serde_json::{Value, json};

use crate::config::{Browser, DriverConfig};
use crate::error::{Result, WebDriverError};

/// Key under which the driver returns an element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Match the `id` attribute exactly.
    Id(String),
    Css(String),
    XPath(String),
    TagName(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Self::TagName(value.into())
    }

    /// W3C `using` strategy and `value` for this locator.
    ///
    /// W3C has no id strategy, so ids become an attribute selector.
    #[must_use]
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Self::Id(id) => ("css selector", format!("[id=\"{}\"]", escape_css_string(id))),
            Self::Css(selector) => ("css selector", selector.clone()),
            Self::XPath(path) => ("xpath", path.clone()),
            Self::TagName(tag) => ("tag name", tag.clone()),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let (using, value) = self.strategy();
        json!({ "using": using, "value": value })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Css(selector) => write!(f, "css={selector}"),
            Self::XPath(path) => write!(f, "xpath={path}"),
            Self::TagName(tag) => write!(f, "tag={tag}"),
        }
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Reference to an element inside the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parses an element reference object.
    ///
    /// # Errors
    ///
    /// Fails when the value carries no element key.
    pub fn from_value(value: &Value) -> Result<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(Self::new)
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("not an element: {value}")))
    }

    /// Parses an array of element references.
    ///
    /// # Errors
    ///
    /// Fails when the value is not an array of element references.
    pub fn list_from_value(value: &Value) -> Result<Vec<Self>> {
        value
            .as_array()
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("not a list: {value}")))?
            .iter()
            .map(Self::from_value)
            .collect()
    }
}

/// Builds the new-session capabilities body.
#[must_use]
pub fn new_session_body(config: &DriverConfig) -> Value {
    let mut capabilities = json!({ "browserName": config.browser.capability_name() });
    if config.headless {
        let (key, arg) = match config.browser {
            Browser::Firefox => ("moz:firefoxOptions", "-headless"),
            Browser::Chrome => ("goog:chromeOptions", "--headless=new"),
        };
        capabilities[key] = json!({ "args": [arg] });
    }
    json!({ "capabilities": { "alwaysMatch": capabilities } })
}

/// Unwraps the `value` of a driver response, mapping W3C error bodies to errors.
///
/// # Errors
///
/// Returns [`WebDriverError::Protocol`] for W3C errors and
/// [`WebDriverError::UnexpectedResponse`] for anything unparseable.
pub fn parse_response(status: u16, body: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(body).map_err(|err| {
        WebDriverError::UnexpectedResponse(format!("status {status}, invalid json: {err}"))
    })?;
    let value = parsed
        .get("value")
        .cloned()
        .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("status {status}: {body}")))?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(WebDriverError::Protocol {
            error: error.to_string(),
            message,
        });
    }
    if !(200..300).contains(&status) {
        return Err(WebDriverError::UnexpectedResponse(format!(
            "status {status}: {body}"
        )));
    }
    Ok(value)
}

/// Extracts the session id from a new-session response value.
///
/// # Errors
///
/// Fails when the value carries no `sessionId`.
pub fn session_id(value: &Value) -> Result<String> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("missing sessionId: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_locator_becomes_attribute_selector() {
        let locator = Locator::id("ctl00_cp_partName");
        assert_eq!(
            locator.to_json(),
            json!({ "using": "css selector", "value": "[id=\"ctl00_cp_partName\"]" })
        );
    }

    #[test]
    fn test_id_locator_escapes_quotes() {
        let (_, value) = Locator::id("a\"b").strategy();
        assert_eq!(value, "[id=\"a\\\"b\"]");
    }

    #[test]
    fn test_xpath_and_tag_strategies() {
        assert_eq!(Locator::xpath("//td").strategy().0, "xpath");
        assert_eq!(Locator::tag("tr").strategy(), ("tag name", "tr".to_string()));
    }

    #[test]
    fn test_parse_success_value() {
        let value = parse_response(200, r#"{"value": "https://example.test/"}"#).unwrap();
        assert_eq!(value, json!("https://example.test/"));
    }

    #[test]
    fn test_parse_null_value() {
        assert_eq!(parse_response(200, r#"{"value": null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_w3c_error() {
        let body = r#"{"value": {"error": "no such element", "message": "Unable to locate", "stacktrace": ""}}"#;
        let err = parse_response(404, body).unwrap_err();
        assert!(err.is_no_such_element());
        assert_eq!(err.to_string(), "no such element: Unable to locate");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_response(502, "Bad Gateway"),
            Err(WebDriverError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_element_parsing() {
        let value = json!([{ ELEMENT_KEY: "a1" }, { ELEMENT_KEY: "b2" }]);
        let elements = Element::list_from_value(&value).unwrap();
        assert_eq!(elements, vec![Element::new("a1"), Element::new("b2")]);
        assert!(Element::from_value(&json!({ "other": 1 })).is_err());
    }

    #[test]
    fn test_headless_capabilities() {
        let config = DriverConfig::default()
            .with_browser(Browser::Chrome)
            .with_headless(true);
        let body = new_session_body(&config);
        assert_eq!(
            body["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"][0],
            "--headless=new"
        );
        let body = new_session_body(&DriverConfig::default());
        assert_eq!(body["capabilities"]["alwaysMatch"]["browserName"], "firefox");
        assert!(body["capabilities"]["alwaysMatch"].get("moz:firefoxOptions").is_none());
    }

    #[test]
    fn test_session_id() {
        let value = json!({ "sessionId": "abc", "capabilities": {} });
        assert_eq!(session_id(&value).unwrap(), "abc");
    }
}
