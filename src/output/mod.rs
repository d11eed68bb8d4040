//! Output module for persisting and summarizing crawl results
//!
//! This module handles:
//! - Writing the JSON snapshot of a finished crawl
//! - Reading a snapshot back
//! - Computing and printing snapshot statistics

mod snapshot;
pub mod stats;

pub use snapshot::{load_snapshot, save_snapshot};
pub use stats::{print_statistics, SnapshotStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
