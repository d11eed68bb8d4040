//! Page renderer abstraction
//!
//! The crawl loop talks to the upstream listing only through
//! [`PageRenderer`]: navigate to a page, wait for the listing to become
//! ready, and take a snapshot of the rendered document. Element access on
//! that snapshot goes through the [`ElementHandle`] capability trait.
//!
//! Two renderers are provided:
//! - [`HttpRenderer`] fetches server-rendered HTML with `reqwest`
//! - `ChromiumRenderer` (feature `browser`) drives headless Chromium

#[cfg(feature = "browser")]
pub mod chromium;
mod element;
mod http;

#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;
pub use element::{ElementHandle, ExtractError};
pub use http::HttpRenderer;

use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while acquiring or rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Selector '{selector}' did not appear within {timeout_ms}ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid readiness selector: {0}")]
    InvalidSelector(String),

    #[error("No page has been loaded")]
    NoDocument,

    #[error("Browser error: {0}")]
    Browser(String),
}

/// A rendered page, captured as serialized HTML
///
/// The snapshot is plain data so it can cross await points; parse it with
/// [`RenderedDocument::parse`] inside synchronous code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// URL the document was loaded from
    pub url: String,

    /// Serialized HTML of the rendered DOM
    pub html: String,
}

impl RenderedDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Parses the snapshot into a queryable DOM tree
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// A browser-like session holding a single page for the lifetime of a run
#[async_trait]
pub trait PageRenderer: Send {
    /// Navigates the page to `url` and waits for the load to settle
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// Waits until `selector` matches an element on the current page
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// Captures the current page as a [`RenderedDocument`]
    async fn document(&mut self) -> Result<RenderedDocument, RenderError>;

    /// Releases the session; further calls are not expected
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// Returns true if `selector` matches at least one element of `html`
pub(crate) fn document_has_selector(html: &str, selector: &str) -> Result<bool, RenderError> {
    let document = Html::parse_document(html);
    let found = document
        .root_element()
        .query_one(selector)
        .map_err(|e| RenderError::InvalidSelector(e.to_string()))?
        .is_some();
    Ok(found)
}
