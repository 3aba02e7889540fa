use async_trait::async_trait;
pub use holdfast_common::protocol::NavigationResult;
use holdfast_common::protocol::{ElementId, ElementSnapshot};

#[derive(thiserror::Error, Debug, Clone)]
pub enum BackendError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element {id} not found")]
    ElementNotFound { id: ElementId },

    #[error("Element {id} is stale (removed from DOM)")]
    ElementStale { id: ElementId },

    #[error("Element {id} is not interactable: {reason}")]
    ElementNotInteractable { id: ElementId, reason: String },

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    #[error("Not ready")]
    NotReady,

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// A browser session and the single live page it drives.
///
/// Every implementation (CDP, WebDriver, the in-memory test page) answers the
/// same small vocabulary: query elements as snapshots, act on a snapshot's
/// handle, read it back. Resolution and verification live in the engine.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, connect to driver, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL. Invalidates all element handles.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    async fn current_url(&mut self) -> Result<String, BackendError>;

    /// Navigate back in browser history.
    async fn go_back(&mut self) -> Result<NavigationResult, BackendError> {
        Err(BackendError::NotSupported("go_back".into()))
    }

    /// All elements matching a CSS selector, in document order.
    async fn query(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, BackendError>;

    /// Fresh snapshot of a previously returned element.
    async fn inspect(&mut self, id: ElementId) -> Result<ElementSnapshot, BackendError>;

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError>;

    /// Replace the element's value with `text`, exactly as given.
    async fn fill(&mut self, id: ElementId, text: &str) -> Result<(), BackendError>;

    /// Tick a checkbox or radio. Clicking is enough unless it is already checked.
    async fn check(&mut self, id: ElementId) -> Result<(), BackendError> {
        if self.inspect(id).await?.checked {
            return Ok(());
        }
        self.click(id).await
    }

    /// Capture a full-page PNG screenshot.
    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError>;
}
