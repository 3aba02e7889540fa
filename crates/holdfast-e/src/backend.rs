use crate::webdriver::{self, DEFAULT_WEBDRIVER_URL, WebDriverClient};
use async_trait::async_trait;
use holdfast_engine::backend::{Backend, BackendError, NavigationResult};
use holdfast_engine::config::schema::BrowserConfig;
use holdfast_engine::protocol::{ElementId, ElementSnapshot};
use holdfast_engine::script;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const SCRIPT_ATTEMPTS: u32 = 3;
const SCRIPT_RETRY_DELAY: Duration = Duration::from_millis(200);

pub struct WebDriverBackend {
    client: Option<WebDriverClient>,
    config: BrowserConfig,
}

impl WebDriverBackend {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            client: None,
            config,
        }
    }

    pub fn webdriver_url(&self) -> &str {
        self.config
            .webdriver_url
            .as_deref()
            .unwrap_or(DEFAULT_WEBDRIVER_URL)
    }

    fn client(&self) -> Result<&WebDriverClient, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotReady)
    }

    async fn get_navigation_result(
        client: &WebDriverClient,
    ) -> Result<NavigationResult, BackendError> {
        let title = client.client.title().await.unwrap_or_default();
        let url = client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();

        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }

    /// Run a scanner call. Some drivers answer `null` or lose the context
    /// while a document is being replaced. Reads are retried; actions are
    /// not, and hand the `null` back since the action may already have run.
    async fn call(&self, call: &str, read: bool) -> Result<Value, BackendError> {
        let client = self.client()?;
        let body = script::function_body(call);

        let mut last_error = None;
        for attempt in 1..=SCRIPT_ATTEMPTS {
            if attempt > 1 {
                warn!(attempt, "retrying scanner call");
                tokio::time::sleep(SCRIPT_RETRY_DELAY).await;
            }
            match client.client.execute(&body, vec![]).await {
                Ok(Value::Null) if !read => return Ok(Value::Null),
                Ok(Value::Null) => {
                    last_error = Some(BackendError::ScriptError("scanner returned null".into()));
                }
                Ok(value) => return Ok(value),
                Err(e) => {
                    let message = e.to_string();
                    if message.contains("undefined is not an object")
                        || message.contains("Holdfast is not defined")
                    {
                        last_error = Some(BackendError::ScriptError(message));
                        continue;
                    }
                    return Err(BackendError::ScriptError(message));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| BackendError::ScriptError("failed after maximum retries".into())))
    }

    async fn act(&self, id: ElementId, call: &str) -> Result<(), BackendError> {
        match self.call(call, false).await? {
            // An action that navigates tears the context down before replying.
            // The post-condition check decides whether it took.
            Value::Null => {
                info!(id, "action reply lost, assuming navigation");
                Ok(())
            }
            reply => script::decode_element::<Value>(reply, id).map(|_| ()),
        }
    }
}

impl Default for WebDriverBackend {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        let url = self.webdriver_url().to_string();
        info!(url = %url, browser = ?self.config.kind, "connecting to WebDriver");
        let client = WebDriverClient::connect(&url, webdriver::capabilities(&self.config)).await?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client.close().await?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client()?;

        info!(url = %url, "navigating");
        client
            .client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::get_navigation_result(client).await
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        let client = self.client()?;
        client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| BackendError::Navigation(e.to_string()))
    }

    async fn go_back(&mut self) -> Result<NavigationResult, BackendError> {
        let client = self.client()?;
        client
            .client
            .back()
            .await
            .map_err(|e| BackendError::Navigation(format!("go_back failed: {}", e)))?;

        Self::get_navigation_result(client).await
    }

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, BackendError> {
        let reply = self.call(&script::query(selector)?, true).await?;
        script::decode_query(reply)
    }

    async fn inspect(&mut self, id: ElementId) -> Result<ElementSnapshot, BackendError> {
        let reply = self.call(&script::inspect(id), true).await?;
        script::decode_element(reply, id)
    }

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError> {
        self.act(id, &script::click(id)).await
    }

    async fn fill(&mut self, id: ElementId, text: &str) -> Result<(), BackendError> {
        self.act(id, &script::fill(id, text)?).await
    }

    async fn check(&mut self, id: ElementId) -> Result<(), BackendError> {
        self.act(id, &script::check(id)).await
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client()?;
        client
            .client
            .screenshot()
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))
    }
}
