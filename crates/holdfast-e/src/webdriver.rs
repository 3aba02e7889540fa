use fantoccini::{Client, ClientBuilder};
use holdfast_engine::backend::BackendError;
use holdfast_engine::config::schema::{BrowserConfig, BrowserKind};
use serde_json::{Map, Value, json};

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

pub struct WebDriverClient {
    pub client: Client,
}

/// W3C capabilities for the configured browser.
pub fn capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    let size = format!("{},{}", config.viewport.width, config.viewport.height);
    match config.kind {
        BrowserKind::Firefox => {
            let mut args = vec![
                format!("--width={}", config.viewport.width),
                format!("--height={}", config.viewport.height),
            ];
            if config.headless {
                args.push("-headless".into());
            }
            caps.insert("browserName".into(), json!("firefox"));
            caps.insert("moz:firefoxOptions".into(), json!({ "args": args }));
        }
        BrowserKind::Webkit => {
            let mut args = vec!["--automation".to_string()];
            if config.headless {
                args.push("--headless".into());
            }
            caps.insert("webkitgtk:browserOptions".into(), json!({ "args": args }));
        }
        BrowserKind::Chromium => {
            let mut args = vec![format!("--window-size={}", size), "--no-sandbox".to_string()];
            if config.headless {
                args.push("--headless=new".into());
            }
            caps.insert("browserName".into(), json!("chrome"));
            caps.insert("goog:chromeOptions".into(), json!({ "args": args }));
        }
    }
    caps
}

impl WebDriverClient {
    pub async fn connect(url: &str, caps: Map<String, Value>) -> Result<Self, BackendError> {
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(url)
            .await
            .map_err(|e| {
                BackendError::Other(format!("Failed to connect to WebDriver at {}: {}", url, e))
            })?;

        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), BackendError> {
        self.client
            .close()
            .await
            .map_err(|e| BackendError::Other(format!("Failed to close session: {}", e)))
    }
}
