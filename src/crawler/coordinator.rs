//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that coordinates:
//! - Navigating to each listing page and waiting for it to render
//! - Parsing listing items into records
//! - Applying the termination policy
//! - Aggregating records and pacing requests
//! - Finalizing the dataset and releasing the renderer

use crate::catalog::{CrawlDataset, ModelRecord};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::parser::{parse_listing, LIST_SELECTOR};
use crate::crawler::termination::{should_stop, PageObservation, StopReason, Termination};
use crate::renderer::{PageRenderer, RenderError, RenderedDocument};
use crate::state::CrawlPhase;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Where the listing lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Search URL without the `page` parameter
    pub base_url: Url,

    /// Origin that record links resolve against
    pub origin: Url,
}

impl CrawlTarget {
    /// Parses the listing location from the configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.source.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
        let origin = Url::parse(&config.source.origin)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin: {}", e)))?;
        Ok(Self { base_url, origin })
    }

    /// URL of the 1-indexed listing page
    ///
    /// Any `page` parameter already on the base URL is replaced.
    pub fn page_url(&self, page: u32) -> Url {
        let retained: Vec<(String, String)> = self
            .base_url
            .query_pairs()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair("page", &page.to_string());
        url
    }
}

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The finalized dataset, ready to persist
    pub dataset: CrawlDataset,

    /// Why the loop stopped
    pub stop_reason: StopReason,

    /// Highest page index that was requested
    pub pages_attempted: u32,

    /// Set when the renderer failed to close after the loop ended
    ///
    /// The dataset is still complete; callers persist it first and then
    /// report the failure.
    pub teardown_error: Option<RenderError>,
}

/// Main crawler coordinator structure
///
/// Owns the renderer session and the in-progress aggregate for one run.
/// Pages are visited strictly one at a time.
pub struct Coordinator<R: PageRenderer> {
    renderer: R,
    target: CrawlTarget,
    settings: CrawlerConfig,
    models: Vec<ModelRecord>,
    productive_pages: u32,
    pages_attempted: u32,
}

impl<R: PageRenderer> Coordinator<R> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `renderer` - An open renderer session; closed when the run ends
    /// * `target` - Listing location
    /// * `settings` - Page cap, readiness timeout and pacing delay
    pub fn new(renderer: R, target: CrawlTarget, settings: CrawlerConfig) -> Self {
        Self {
            renderer,
            target,
            settings,
            models: Vec::new(),
            productive_pages: 0,
            pages_attempted: 0,
        }
    }

    /// Runs the page loop to completion
    ///
    /// Page-level failures end the loop but never fail the run: whatever
    /// was aggregated so far becomes the dataset. The renderer is closed
    /// before returning; a close failure is carried in
    /// [`CrawlOutcome::teardown_error`].
    pub async fn run(mut self) -> CrawlOutcome {
        tracing::info!(
            "Starting crawl of {} (max {} pages)",
            self.target.base_url,
            self.settings.max_pages
        );

        let mut phase = CrawlPhase::start();
        let stop_reason = loop {
            phase = match phase {
                CrawlPhase::Stopped(reason) => break reason,
                active => self.step(active).await,
            };
            tracing::trace!("Crawl phase: {}", phase);
        };

        let teardown_error = match self.renderer.close().await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Failed to close renderer: {}", e);
                Some(e)
            }
        };

        let dataset = CrawlDataset::finalize(self.models, self.productive_pages);

        tracing::info!(
            "Crawl stopped ({}): {} models from {} pages",
            stop_reason,
            dataset.total_models,
            dataset.total_pages
        );

        CrawlOutcome {
            dataset,
            stop_reason,
            pages_attempted: self.pages_attempted,
            teardown_error,
        }
    }

    /// Performs one transition of the crawl state machine
    async fn step(&mut self, phase: CrawlPhase) -> CrawlPhase {
        match phase {
            CrawlPhase::Fetching { page } => {
                self.pages_attempted = page;
                let url = self.target.page_url(page);
                tracing::info!("Crawling page {}: {}", page, url);

                match self.fetch_page(url.as_str()).await {
                    Ok(document) => CrawlPhase::Extracting { page, document },
                    Err(e) => {
                        tracing::warn!("Page {} failed to load, stopping: {}", page, e);
                        CrawlPhase::Stopped(StopReason::FetchError)
                    }
                }
            }

            CrawlPhase::Extracting { page, document } => {
                let result = parse_listing(&document, &self.target.origin);
                let decision = should_stop(
                    page,
                    PageObservation::Loaded(&result),
                    self.settings.max_pages,
                );

                match decision {
                    Termination::Stop(reason) if !reason.keeps_page() => {
                        tracing::info!(
                            "Page {} yielded no records ({} raw items), stopping: {}",
                            page,
                            result.raw_item_count,
                            reason
                        );
                        CrawlPhase::Stopped(reason)
                    }
                    _ => {
                        tracing::info!(
                            "Page {} extracted {} models ({} rejected)",
                            page,
                            result.valid_count(),
                            result.rejected_count
                        );
                        CrawlPhase::Aggregating {
                            page,
                            result,
                            decision,
                        }
                    }
                }
            }

            CrawlPhase::Aggregating {
                page,
                result,
                decision,
            } => {
                self.models.extend(result.records);
                self.productive_pages += 1;

                match decision {
                    Termination::Stop(reason) => {
                        tracing::info!("Page {} reached the page cap, stopping", page);
                        CrawlPhase::Stopped(reason)
                    }
                    Termination::Continue => CrawlPhase::Advancing { page },
                }
            }

            CrawlPhase::Advancing { page } => {
                let delay = self.inter_page_delay();
                if !delay.is_zero() {
                    tracing::debug!("Waiting {:?} before page {}", delay, page + 1);
                    tokio::time::sleep(delay).await;
                }
                CrawlPhase::Fetching { page: page + 1 }
            }

            stopped @ CrawlPhase::Stopped(_) => stopped,
        }
    }

    /// Navigates to `url` and captures the listing once it has rendered
    async fn fetch_page(&mut self, url: &str) -> Result<RenderedDocument, RenderError> {
        let timeout = Duration::from_millis(self.settings.page_timeout_ms);
        self.renderer.navigate(url).await?;
        self.renderer.wait_for_selector(LIST_SELECTOR, timeout).await?;
        self.renderer.document().await
    }

    fn inter_page_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.settings.inter_page_delay_seconds).unwrap_or_default()
    }
}
