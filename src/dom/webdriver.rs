use crate::dom::{Document, DomError};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};

const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const SCROLL_TO_SCRIPT: &str = "window.scrollTo(0, arguments[0]);";

/// Common local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Document backed by a live WebDriver session
pub struct LiveDocument {
    client: Client,
}

impl LiveDocument {
    /// Wrap an existing session
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect to WebDriver and navigate to `url`
    pub async fn open(webdriver_url: &str, url: &str) -> Result<Self, DomError> {
        let client = connect_to_webdriver(webdriver_url).await?;
        if let Err(e) = client.goto(url).await {
            ::log::error!("Failed to navigate to {}: {}", url, e);
            if let Err(close_err) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", close_err);
            }
            return Err(e.into());
        }
        ::log::info!("Navigated to {}", url);
        Ok(Self::new(client))
    }

    /// End the WebDriver session
    pub async fn close(self) -> Result<(), DomError> {
        self.client.close().await?;
        Ok(())
    }
}

/// Connects to the WebDriver instance, falling back to well-known local ports
pub async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client, DomError> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(DomError::Driver(format!(
        "failed to connect to any WebDriver server (tried {})",
        webdriver_url
    )))
}

/// Treats "no such element" as absence rather than failure
fn optional(result: Result<Element, CmdError>) -> Result<Option<Element>, DomError> {
    match result {
        Ok(element) => Ok(Some(element)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn height_from(value: &Value) -> Result<u64, DomError> {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
        .ok_or_else(|| DomError::Script(format!("unexpected scrollHeight value: {}", value)))
}

#[async_trait]
impl Document for LiveDocument {
    type Element = Element;

    async fn find(&self, selector: &str) -> Result<Option<Element>, DomError> {
        optional(self.client.find(Locator::Css(selector)).await)
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    async fn find_within(
        &self,
        scope: &Element,
        selector: &str,
    ) -> Result<Option<Element>, DomError> {
        optional(scope.find(Locator::Css(selector)).await)
    }

    async fn inner_text(&self, element: &Element) -> Result<String, DomError> {
        Ok(element.text().await?)
    }

    async fn scroll_height(&self) -> Result<u64, DomError> {
        let value = self
            .client
            .execute(SCROLL_HEIGHT_SCRIPT, vec![])
            .await
            .map_err(|e| DomError::Script(e.to_string()))?;
        height_from(&value)
    }

    async fn scroll_to(&self, y: u64) -> Result<(), DomError> {
        self.client
            .execute(SCROLL_TO_SCRIPT, vec![json!(y)])
            .await
            .map_err(|e| DomError::Script(e.to_string()))?;
        Ok(())
    }
}
