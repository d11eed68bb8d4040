//! Catalog data model
//!
//! Records extracted from the listing, the per-page result handed to the
//! termination detector, and the dataset written to the snapshot.

mod query;

pub use query::{ModelFilter, ModelQueryResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalog entry extracted from a listing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capabilities: Vec<String>,
    pub sizes: Vec<String>,
    pub url: Option<String>,
}

impl ModelRecord {
    /// Returns true if the record carries at least one size variant
    ///
    /// Entries without size metadata are placeholder or malformed cards and
    /// never reach the aggregate.
    pub fn is_valid(&self) -> bool {
        !self.sizes.is_empty()
    }
}

/// Records produced by a single page visit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Valid records, in item order
    pub records: Vec<ModelRecord>,

    /// Number of listing items on the page before extraction
    pub raw_item_count: usize,

    /// Text content of the first listing item, if any
    pub first_item_text: Option<String>,

    /// Items dropped because they failed extraction or validation
    pub rejected_count: usize,
}

impl PageResult {
    /// Number of records that survived extraction and validation
    pub fn valid_count(&self) -> usize {
        self.records.len()
    }
}

/// The aggregated output of one crawl run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlDataset {
    /// UTC instant at which the run was finalized
    pub last_updated: DateTime<Utc>,

    /// Pages that yielded at least one valid record
    pub total_pages: u32,

    /// Always equal to `models.len()`
    pub total_models: usize,

    /// Valid records in page order, then item order
    pub models: Vec<ModelRecord>,
}

impl CrawlDataset {
    /// Builds the dataset for a finished run, stamping the current time
    pub fn finalize(models: Vec<ModelRecord>, total_pages: u32) -> Self {
        Self {
            last_updated: Utc::now(),
            total_pages,
            total_models: models.len(),
            models,
        }
    }
}
