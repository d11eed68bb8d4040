//! Crawl termination policy
//!
//! After every page visit the coordinator asks [`should_stop`] whether to
//! schedule the next page. Conditions are checked in a fixed order; the
//! first match decides the reason.

use crate::catalog::PageResult;
use crate::crawler::parser::is_sentinel_page;
use std::fmt;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Navigation or the listing readiness wait failed
    FetchError,

    /// The listing rendered no items
    EmptyPage,

    /// The listing rendered only the "no results" placeholder
    SentinelEmpty,

    /// Items were present but none survived extraction and validation
    NoValidRecords,

    /// The configured page cap was reached
    PageCap,
}

impl StopReason {
    /// Returns true if the page that triggered this stop contributes records
    ///
    /// Only the page cap keeps the current page; every other reason fires on
    /// a page that produced nothing.
    pub fn keeps_page(&self) -> bool {
        matches!(self, Self::PageCap)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchError => "fetch-error",
            Self::EmptyPage => "empty-page",
            Self::SentinelEmpty => "sentinel-empty",
            Self::NoValidRecords => "no-valid-records",
            Self::PageCap => "page-cap",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the coordinator observed for one page
#[derive(Debug, Clone, Copy)]
pub enum PageObservation<'a> {
    /// The page could not be loaded or never became ready
    FetchFailed,

    /// The page loaded and was parsed
    Loaded(&'a PageResult),
}

/// Outcome of the termination check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Continue,
    Stop(StopReason),
}

/// Decides whether crawling continues after visiting `page_index`
///
/// # Precedence
///
/// | Order | Condition | Reason |
/// |-------|-----------|--------|
/// | 1 | Fetch or readiness failure | `fetch-error` |
/// | 2 | No raw items | `empty-page` |
/// | 3 | One raw item containing the placeholder text | `sentinel-empty` |
/// | 4 | No valid records after filtering | `no-valid-records` |
/// | 5 | `page_index >= max_pages` | `page-cap` |
///
/// The page cap only prevents scheduling another page; the records of the
/// page that reached it are kept.
pub fn should_stop(
    page_index: u32,
    observation: PageObservation<'_>,
    max_pages: u32,
) -> Termination {
    let page = match observation {
        PageObservation::FetchFailed => return Termination::Stop(StopReason::FetchError),
        PageObservation::Loaded(page) => page,
    };

    if page.raw_item_count == 0 {
        return Termination::Stop(StopReason::EmptyPage);
    }

    if is_sentinel_page(page) {
        return Termination::Stop(StopReason::SentinelEmpty);
    }

    if page.valid_count() == 0 {
        return Termination::Stop(StopReason::NoValidRecords);
    }

    if page_index >= max_pages {
        return Termination::Stop(StopReason::PageCap);
    }

    Termination::Continue
}
