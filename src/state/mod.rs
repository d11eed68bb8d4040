//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the coordinator's state machine (fetching, extracting,
//!   aggregating, advancing, stopped)

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
