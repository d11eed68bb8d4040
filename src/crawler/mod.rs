//! Crawler module for listing traversal and record extraction
//!
//! This module contains the core crawling logic, including:
//! - Record extraction from listing items
//! - Listing parsing and placeholder detection
//! - The termination policy
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod parser;
mod termination;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlTarget};
pub use extractor::extract_record;
pub use parser::{
    extract_page, is_sentinel_page, parse_listing, ITEM_SELECTOR, LIST_SELECTOR, SENTINEL_TEXT,
};
pub use termination::{should_stop, PageObservation, StopReason, Termination};

use crate::config::{Config, CrawlerConfig, RendererEngine};
use crate::renderer::HttpRenderer;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the listing location
/// 2. Open the configured renderer session
/// 3. Visit listing pages until a stop condition fires
/// 4. Close the session and finalize the dataset
///
/// Page-level failures only end the crawl early. An error is returned
/// only if the renderer cannot be set up.
///
/// # Example
///
/// ```no_run
/// use catalog_snapshot::config::load_config;
/// use catalog_snapshot::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let outcome = crawl(&config).await?;
/// println!("{} models", outcome.dataset.total_models);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlOutcome> {
    let target = CrawlTarget::from_config(config)?;
    let settings = config.crawler.clone();

    match config.renderer.engine {
        RendererEngine::Http => {
            let renderer = HttpRenderer::new(&config.renderer)?;
            Ok(Coordinator::new(renderer, target, settings).run().await)
        }
        RendererEngine::Chromium => crawl_with_chromium(config, target, settings).await,
    }
}

#[cfg(feature = "browser")]
async fn crawl_with_chromium(
    config: &Config,
    target: CrawlTarget,
    settings: CrawlerConfig,
) -> Result<CrawlOutcome> {
    let renderer = crate::renderer::ChromiumRenderer::launch(&config.renderer).await?;
    Ok(Coordinator::new(renderer, target, settings).run().await)
}

#[cfg(not(feature = "browser"))]
async fn crawl_with_chromium(
    _config: &Config,
    _target: CrawlTarget,
    _settings: CrawlerConfig,
) -> Result<CrawlOutcome> {
    Err(crate::ConfigError::Validation(
        "renderer engine 'chromium' requires the 'browser' feature".to_string(),
    )
    .into())
}
