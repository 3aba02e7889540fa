use crate::cdp::CdpClient;
use async_trait::async_trait;
use holdfast_engine::backend::{Backend, BackendError, NavigationResult};
use holdfast_engine::config::schema::BrowserConfig;
use holdfast_engine::protocol::{ElementId, ElementSnapshot};
use holdfast_engine::script;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Settle time after `history.back()`, which returns before the page commits.
const HISTORY_SETTLE: Duration = Duration::from_millis(300);

pub struct HeadlessBackend {
    client: Option<CdpClient>,
    config: BrowserConfig,
}

impl HeadlessBackend {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            client: None,
            config,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    fn client(&self) -> Result<&CdpClient, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotReady)
    }

    async fn get_navigation_result(
        page: &chromiumoxide::Page,
    ) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }

    async fn element_call(&self, id: ElementId, call: &str) -> Result<(), BackendError> {
        let reply = self.client()?.call(call).await?;
        script::decode_element::<Value>(reply, id)?;
        Ok(())
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Headless Backend (Chromium)...");
        let client = CdpClient::launch(&self.config).await?;
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
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::get_navigation_result(&client.page).await
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        let client = self.client()?;
        Ok(client
            .page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default())
    }

    async fn go_back(&mut self) -> Result<NavigationResult, BackendError> {
        let client = self.client()?;
        client
            .page
            .evaluate("history.back();")
            .await
            .map_err(|e| BackendError::Navigation(format!("go_back failed: {}", e)))?;
        tokio::time::sleep(HISTORY_SETTLE).await;
        Self::get_navigation_result(&client.page).await
    }

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, BackendError> {
        let reply = self.client()?.call(&script::query(selector)?).await?;
        script::decode_query(reply)
    }

    async fn inspect(&mut self, id: ElementId) -> Result<ElementSnapshot, BackendError> {
        let reply = self.client()?.call(&script::inspect(id)).await?;
        script::decode_element(reply, id)
    }

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError> {
        self.element_call(id, &script::click(id)).await
    }

    async fn fill(&mut self, id: ElementId, text: &str) -> Result<(), BackendError> {
        self.element_call(id, &script::fill(id, text)?).await
    }

    async fn check(&mut self, id: ElementId) -> Result<(), BackendError> {
        self.element_call(id, &script::check(id)).await
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client()?;
        client
            .page
            .screenshot(chromiumoxide::page::ScreenshotParams::builder().build())
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))
    }
}
