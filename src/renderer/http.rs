//! HTTP renderer
//!
//! Fetches listing pages with a plain GET and treats the returned HTML as
//! the rendered document. No JavaScript runs, so readiness is decided by
//! whether the listing container is already present in the response.

use super::{document_has_selector, PageRenderer, RenderError, RenderedDocument};
use crate::config::RendererConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
pub(crate) fn build_http_client(config: &RendererConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer backed by a `reqwest` client
///
/// # Example
///
/// ```no_run
/// use catalog_snapshot::config::RendererConfig;
/// use catalog_snapshot::renderer::HttpRenderer;
///
/// let renderer = HttpRenderer::new(&RendererConfig::default()).unwrap();
/// ```
pub struct HttpRenderer {
    client: Client,
    current: Option<RenderedDocument>,
}

impl HttpRenderer {
    /// Creates a renderer with a client built from `config`
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client))
    }

    /// Creates a renderer around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.current = None;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Navigation {
                    url: url.to_string(),
                    message: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                RenderError::Navigation {
                    url: url.to_string(),
                    message: "Connection refused".to_string(),
                }
            } else {
                RenderError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

        self.current = Some(RenderedDocument::new(final_url, body));
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let document = self.current.as_ref().ok_or(RenderError::NoDocument)?;

        if document_has_selector(&document.html, selector)? {
            Ok(())
        } else {
            Err(RenderError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn document(&mut self) -> Result<RenderedDocument, RenderError> {
        self.current.clone().ok_or(RenderError::NoDocument)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.current = None;
        Ok(())
    }
}
