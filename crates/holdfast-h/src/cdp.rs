use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig as ChromeConfig, Page};
use futures::StreamExt;
use holdfast_engine::backend::BackendError;
use holdfast_engine::config::schema::BrowserConfig;
use holdfast_engine::script;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// Bound on one script evaluation. A page blocked by a dialog never answers.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries for context errors during page navigation.
const MAX_CONTEXT_RETRIES: u32 = 10;

/// Delay between retries when context is not found (page navigating).
const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    user_data_dir: Option<PathBuf>,
    cleanup_user_data_dir: bool,
}

impl CdpClient {
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BackendError> {
        let (user_data_dir, cleanup_user_data_dir) = resolve_user_data_dir()?;
        let viewport = config.viewport;
        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .user_data_dir(&user_data_dir)
            .window_size(viewport.width, viewport.height)
            .viewport(Viewport {
                width: viewport.width,
                height: viewport.height,
                ..Viewport::default()
            });

        if config.headless {
            tracing::info!("Launching browser in headless mode");
        } else {
            tracing::info!("Launching browser in visible mode");
            builder = builder.with_head();
        }

        if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
            tracing::info!(chrome_bin = %chrome_bin, "Using custom Chrome binary");
            builder = builder.chrome_executable(chrome_bin);
        }

        let chrome_config = builder
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to build browser config: {}", e)))?;
        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BackendError::Other(format!("Failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::debug!("Browser handler error (ignoring): {}", e);
                }
            }
            tracing::debug!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BackendError::Other(format!("Failed to create page: {}", e)))?;

        let mut console_events = page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .map_err(|e| BackendError::Other(format!("Failed to subscribe to console: {}", e)))?;
        tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let args: Vec<String> = event
                    .args
                    .iter()
                    .map(|arg| arg.description.clone().unwrap_or_default())
                    .collect();
                tracing::debug!(kind = ?event.r#type, "browser console: {}", args.join(" "));
            }
        });

        // A dialog here means page script ran, which form input never should.
        let mut dialog_events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| BackendError::Other(format!("Failed to subscribe to dialogs: {}", e)))?;
        let dialog_page = page.clone();
        tokio::spawn(async move {
            while let Some(event) = dialog_events.next().await {
                tracing::warn!(message = %event.message, kind = ?event.r#type, "page opened a dialog");
                if let Err(e) = dialog_page
                    .execute(HandleJavaScriptDialogParams::new(false))
                    .await
                {
                    tracing::error!("Failed to dismiss dialog: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data_dir: Some(user_data_dir),
            cleanup_user_data_dir,
        })
    }

    /// Evaluate a scanner call, injecting the scanner first when the current
    /// document does not have it. Retries while the page is between documents.
    pub async fn call(&self, call: &str) -> Result<Value, BackendError> {
        let expression = script::expression(call);
        let mut last_error = None;

        for attempt in 0..MAX_CONTEXT_RETRIES {
            let evaluated = tokio::time::timeout(EVAL_TIMEOUT, self.page.evaluate(expression.as_str())).await;
            match evaluated {
                Err(_) => {
                    return Err(BackendError::Timeout {
                        operation: "script evaluation (is a dialog open?)".into(),
                    });
                }
                Ok(Ok(result)) => {
                    return result
                        .into_value::<Value>()
                        .map_err(|e| BackendError::ScriptError(format!("Failed to read result: {}", e)));
                }
                Ok(Err(e)) => {
                    let err = e.to_string();
                    if !is_context_error(&err) {
                        return Err(BackendError::ScriptError(err));
                    }
                    tracing::debug!(
                        "context error (attempt {}/{}), retrying",
                        attempt + 1,
                        MAX_CONTEXT_RETRIES
                    );
                    last_error = Some(err);
                    tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
                }
            }
        }

        Err(BackendError::ScriptError(last_error.unwrap_or_else(|| {
            "evaluation failed after retries".to_string()
        })))
    }

    pub async fn close(mut self) -> Result<(), BackendError> {
        self.browser
            .close()
            .await
            .map_err(|e| BackendError::Other(format!("Error closing browser: {}", e)))?;
        self.handler_task
            .await
            .map_err(|e| BackendError::Other(format!("Error awaiting handler: {}", e)))?;

        if self.cleanup_user_data_dir
            && let Some(dir) = &self.user_data_dir
            && let Err(e) = std::fs::remove_dir_all(dir)
        {
            tracing::debug!("Failed to clean up user-data-dir {}: {}", dir.display(), e);
        }

        Ok(())
    }
}

/// Each session gets a throwaway profile unless `HOLDFAST_USER_DATA_DIR`
/// pins one, so parallel scenarios never share cookies or storage.
fn resolve_user_data_dir() -> Result<(PathBuf, bool), BackendError> {
    if let Ok(dir) = std::env::var("HOLDFAST_USER_DATA_DIR") {
        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)?;
        tracing::info!(path = %path.display(), "Using user data dir from HOLDFAST_USER_DATA_DIR");
        return Ok((path, false));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BackendError::Other(format!("System clock error: {}", e)))?
        .as_nanos();
    let unique = format!("holdfast-chromium-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::debug!(path = %path.display(), "Using isolated user data dir");
    Ok((path, true))
}
