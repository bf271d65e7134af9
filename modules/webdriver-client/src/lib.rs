pub mod error;

pub use error::{Result, WebDriverError};

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

/// W3C web element identifier key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

pub struct WebDriverClient {
    client: reqwest::Client,
    base_url: String,
}

/// Opaque reference to an element inside a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(pub String);

impl WebDriverClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start a Chrome session with the given command-line switches.
    pub async fn new_session(&self, browser_args: &[&str]) -> Result<Session> {
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": browser_args },
                }
            }
        });

        let value = call(
            self.client
                .post(format!("{}/session", self.base_url))
                .json(&body),
        )
        .await?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::Protocol("New session response has no sessionId".into()))?
            .to_string();

        debug!(session_id = %id, "WebDriver session started");

        Ok(Session {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            id,
            closed: false,
        })
    }
}

/// A live browser session. Call [`Session::delete`] to end it; a session
/// dropped without being deleted is torn down in the background.
pub struct Session {
    client: reqwest::Client,
    base_url: String,
    id: String,
    closed: bool,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.id, suffix)
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        call(
            self.client
                .post(self.endpoint("/url"))
                .json(&json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    /// Find all elements matching a CSS selector.
    pub async fn find_elements(&self, css: &str) -> Result<Vec<ElementId>> {
        let value = call(
            self.client
                .post(self.endpoint("/elements"))
                .json(&json!({ "using": "css selector", "value": css })),
        )
        .await?;

        let items = value
            .as_array()
            .ok_or_else(|| WebDriverError::Protocol("Find elements did not return an array".into()))?;

        items
            .iter()
            .map(|item| {
                item.get(ELEMENT_KEY)
                    .and_then(Value::as_str)
                    .map(|id| ElementId(id.to_string()))
                    .ok_or_else(|| WebDriverError::Protocol(format!("Malformed element reference: {item}")))
            })
            .collect()
    }

    /// Rendered text of an element.
    pub async fn element_text(&self, element: &ElementId) -> Result<String> {
        let value = call(
            self.client
                .get(self.endpoint(&format!("/element/{}/text", element.0))),
        )
        .await?;

        match value {
            Value::String(text) => Ok(text),
            Value::Null => Ok(String::new()),
            other => Err(WebDriverError::Protocol(format!("Element text was not a string: {other}"))),
        }
    }

    /// Run a synchronous script in the page and return its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        call(
            self.client
                .post(self.endpoint("/execute/sync"))
                .json(&json!({ "script": script, "args": args })),
        )
        .await
    }

    /// End the session and quit the browser.
    pub async fn delete(mut self) -> Result<()> {
        self.closed = true;
        call(self.client.delete(self.endpoint(""))).await?;
        debug!(session_id = %self.id, "WebDriver session deleted");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(session_id = %self.id, "Session dropped outside a runtime, browser left running");
            return;
        };

        let request = self.client.delete(self.endpoint(""));
        let session_id = self.id.clone();
        runtime.spawn(async move {
            if let Err(e) = call(request).await {
                warn!(session_id = %session_id, error = %e, "Background session teardown failed");
            }
        });
    }
}

/// Send a WebDriver command and unwrap the `{"value": ...}` envelope.
async fn call(request: reqwest::RequestBuilder) -> Result<Value> {
    let resp = request.send().await?;
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body
            .pointer("/value/message")
            .and_then(Value::as_str)
            .or_else(|| body.pointer("/value/error").and_then(Value::as_str))
            .unwrap_or("unknown error")
            .to_string();
        return Err(WebDriverError::Api {
            status: status.as_u16(),
            message,
        });
    }

    match body {
        Value::Object(mut map) => Ok(map.remove("value").unwrap_or(Value::Null)),
        other => Err(WebDriverError::Protocol(format!("Response is not a JSON object: {other}"))),
    }
}
