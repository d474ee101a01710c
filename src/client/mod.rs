//! The page client: everything the pipeline needs from a browser.

pub mod snapshot;
pub mod webdriver;

pub use snapshot::SnapshotClient;
pub use webdriver::WebDriverClient;

use async_trait::async_trait;
use std::time::Duration;

/// Failures of a single page interaction
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The element changed underneath us; re-locating it may succeed
    #[error("stale element reference")]
    Stale,

    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },

    #[error("browser session closed")]
    SessionClosed,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("browser command failed: {0}")]
    Command(String),
}

impl ClientError {
    pub fn is_stale(&self) -> bool {
        matches!(self, ClientError::Stale)
    }

    pub fn is_session_lost(&self) -> bool {
        matches!(self, ClientError::SessionClosed)
    }
}

/// Browser capability consumed by the crawl pipeline.
///
/// Selectors are CSS. A navigation invalidates every element handle obtained
/// before it.
#[async_trait]
pub trait PageClient: Send + Sync {
    type Element: Clone + Send + Sync + std::fmt::Debug;

    async fn navigate(&self, url: &str) -> Result<(), ClientError>;

    /// The first match, or `None` when nothing matches right now
    async fn find(&self, selector: &str) -> Result<Option<Self::Element>, ClientError>;

    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, ClientError>;

    /// Like `find`, scoped to the descendants of `scope`
    async fn find_in(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, ClientError>;

    /// Waits until `selector` matches, failing with `ClientError::Timeout`
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Self::Element, ClientError>;

    /// Clicks the element, falling back to a scripted click when the native
    /// one is intercepted
    async fn click(&self, element: &Self::Element) -> Result<(), ClientError>;

    /// Rendered text, one line per visual line
    async fn read_text(&self, element: &Self::Element) -> Result<String, ClientError>;

    /// `href` and `src` come back resolved to absolute URLs
    async fn read_attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, ClientError>;

    async fn close(&self) -> Result<(), ClientError>;
}
