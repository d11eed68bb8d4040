/// Crawl phase definitions for driving the page loop
///
/// This module defines every phase the coordinator passes through while
/// visiting one listing page, and the terminal stopped phase.
use crate::catalog::PageResult;
use crate::crawler::{StopReason, Termination};
use crate::renderer::RenderedDocument;
use std::fmt;

/// Represents the current phase of the crawl loop
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Navigating to a page and waiting for the listing to render
    Fetching { page: u32 },

    /// Reading listing items from a rendered page
    Extracting {
        page: u32,
        document: RenderedDocument,
    },

    /// Appending a page's valid records to the aggregate
    Aggregating {
        page: u32,
        result: PageResult,
        decision: Termination,
    },

    /// Pausing before the next page
    Advancing { page: u32 },

    // ===== Terminal Phase =====
    /// The loop is over; the aggregate is final
    Stopped(StopReason),
}

impl CrawlPhase {
    /// The first phase of every run
    pub fn start() -> Self {
        Self::Fetching { page: 1 }
    }

    /// Page index this phase is working on, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetching { page }
            | Self::Extracting { page, .. }
            | Self::Aggregating { page, .. }
            | Self::Advancing { page } => Some(*page),
            Self::Stopped(_) => None,
        }
    }

    /// Short label used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetching { .. } => "fetching",
            Self::Extracting { .. } => "extracting",
            Self::Aggregating { .. } => "aggregating",
            Self::Advancing { .. } => "advancing",
            Self::Stopped(_) => "stopped",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped(reason) => write!(f, "stopped({})", reason),
            other => match other.page() {
                Some(page) => write!(f, "{}({})", other.name(), page),
                None => write!(f, "{}", other.name()),
            },
        }
    }
}
