//! Chromium-based renderer using chromiumoxide.

use super::{PageRenderer, RenderError, RenderedDocument};
use crate::config::RendererConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Request patterns blocked when `block-resources` is enabled
const BLOCKED_RESOURCE_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.woff", "*.woff2", "*.ttf",
    "*.eot",
];

/// Upper bound on a single navigation, independent of the selector wait
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between selector checks
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Headless Chromium session with a single tab
pub struct ChromiumRenderer {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: JoinHandle<()>,
    current_url: Option<String>,
}

impl ChromiumRenderer {
    /// Launches headless Chromium and opens the tab used for the whole run
    pub async fn launch(config: &RendererConfig) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg(format!("--user-agent={}", config.user_agent));

        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(RenderError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Don't leave a headless process behind
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(RenderError::Launch(format!("failed to open tab: {}", e)));
            }
        };

        if config.block_resources {
            block_resources(&page).await;
        }

        tracing::info!("Launched headless Chromium");

        Ok(Self {
            browser: Some(browser),
            page: Some(page),
            handler,
            current_url: None,
        })
    }

    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Browser("browser session is closed".to_string()))
    }
}

/// Blocks image and font downloads for the tab
///
/// Failure only costs load time, so it is logged and ignored.
async fn block_resources(page: &Page) {
    if let Err(e) = page.execute(EnableParams::default()).await {
        tracing::warn!("Failed to enable network domain: {}", e);
        return;
    }

    let patterns = BLOCKED_RESOURCE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>();

    match page.execute(SetBlockedUrLsParams::new(patterns)).await {
        Ok(_) => tracing::debug!("Blocking image and font requests"),
        Err(e) => tracing::warn!("Failed to block resource requests: {}", e),
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.current_url = None;
        let page = self.page()?;

        match tokio::time::timeout(NAVIGATION_TIMEOUT, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(RenderError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: NAVIGATION_TIMEOUT.as_millis() as u64,
                })
            }
        }

        // Let client-side rendering settle before probing the DOM
        if let Err(e) = page.wait_for_navigation().await {
            tracing::debug!("wait_for_navigation after {} failed: {}", url, e);
        }

        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(RenderError::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn document(&mut self) -> Result<RenderedDocument, RenderError> {
        let url = self.current_url.clone().ok_or(RenderError::NoDocument)?;
        let html = self
            .page()?
            .content()
            .await
            .map_err(|e| RenderError::Browser(format!("failed to read page content: {}", e)))?;
        Ok(RenderedDocument::new(url, html))
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.current_url = None;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::warn!("Failed to close tab: {}", e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            browser
                .close()
                .await
                .map_err(|e| RenderError::Browser(format!("failed to close browser: {}", e)))?;
            if let Err(e) = browser.wait().await {
                tracing::warn!("Failed to reap browser process: {}", e);
            }
        }

        self.handler.abort();
        tracing::debug!("Closed headless Chromium");
        Ok(())
    }
}
