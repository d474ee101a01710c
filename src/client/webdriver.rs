use super::{ClientError, PageClient};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

/// Page client backed by a WebDriver session (ChromeDriver, geckodriver, ...)
#[derive(Clone)]
pub struct WebDriverClient {
    client: Client,
}

impl WebDriverClient {
    /// Wraps an already established fantoccini session
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Connects to the WebDriver instance, trying common local ports when the
    /// configured one is not answering
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, ClientError> {
        match new_session(webdriver_url, headless).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self::from_client(client));
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
            }
        }

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4723", // Appium default
            "http://127.0.0.1:4444",
        ];

        for url in fallback_urls.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = new_session(url, headless).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self::from_client(client));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(ClientError::Navigation {
            url: webdriver_url.to_string(),
            reason: "no WebDriver server reachable".to_string(),
        })
    }
}

async fn new_session(
    webdriver_url: &str,
    headless: bool,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut args = vec!["--window-size=1920,1080", "--disable-gpu"];
    if headless {
        args.push("--headless=new");
    }

    let mut capabilities = serde_json::Map::new();
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

    ClientBuilder::native()
        .capabilities(capabilities)
        .connect(webdriver_url)
        .await
}

/// Maps a WebDriver command failure onto the pipeline's error kinds
fn classify(error: CmdError) -> ClientError {
    if matches!(error, CmdError::WaitTimeout) {
        return ClientError::Command("wait timed out".to_string());
    }

    let message = error.to_string();
    if message.contains("stale element") {
        ClientError::Stale
    } else if message.contains("invalid session id")
        || message.contains("Unable to find session")
        || message.contains("no such window")
    {
        ::log::warn!("Lost WebDriver session: {}", message);
        ClientError::SessionClosed
    } else if message.contains("invalid selector") {
        ClientError::InvalidSelector(message)
    } else {
        ClientError::Command(message)
    }
}

fn click_was_refused(error: &CmdError) -> bool {
    let message = error.to_string();
    message.contains("element click intercepted") || message.contains("not interactable")
}

#[async_trait]
impl PageClient for WebDriverClient {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), ClientError> {
        ::log::debug!("GOTO: {}", url);
        self.client.goto(url).await.map_err(|e| match classify(e) {
            ClientError::Command(reason) => ClientError::Navigation {
                url: url.to_string(),
                reason,
            },
            other => other,
        })
    }

    async fn find(&self, selector: &str) -> Result<Option<Element>, ClientError> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(classify(e)),
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>, ClientError> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .map_err(classify)
    }

    async fn find_in(
        &self,
        scope: &Element,
        selector: &str,
    ) -> Result<Option<Element>, ClientError> {
        match scope.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(classify(e)),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element, ClientError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => ClientError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                },
                other => classify(other),
            })
    }

    async fn click(&self, element: &Element) -> Result<(), ClientError> {
        match element.click().await {
            Ok(()) => Ok(()),
            Err(e) if click_was_refused(&e) => {
                ::log::trace!("Native click refused, using scripted click: {}", e);
                let target = serde_json::to_value(element)
                    .map_err(|e| ClientError::Command(e.to_string()))?;
                self.client
                    .execute("arguments[0].click();", vec![target])
                    .await
                    .map(|_| ())
                    .map_err(classify)
            }
            Err(e) => Err(classify(e)),
        }
    }

    async fn read_text(&self, element: &Element) -> Result<String, ClientError> {
        element.text().await.map_err(classify)
    }

    async fn read_attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, ClientError> {
        // Properties carry resolved URLs; fall back to the raw attribute.
        match element.prop(name).await.map_err(classify)? {
            Some(value) => Ok(Some(value)),
            None => element.attr(name).await.map_err(classify),
        }
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.client.clone().close().await.map_err(classify)
    }
}
