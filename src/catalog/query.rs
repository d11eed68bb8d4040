//! Queries over a loaded snapshot
//!
//! Filtering, lookup by name, and the distinct capability and size tags
//! of a [`CrawlDataset`].

use crate::catalog::{CrawlDataset, ModelRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Filter criteria for searching records
///
/// Every criterion is optional; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,

    /// Case-insensitive substring of the description
    pub description_contains: Option<String>,

    /// Records must carry ALL of these capabilities
    pub capabilities: Vec<String>,

    /// Records must offer at least ONE of these sizes
    pub sizes: Vec<String>,
}

impl ModelFilter {
    /// Returns true if `record` satisfies every criterion
    ///
    /// A text criterion never matches a record whose field is `None`.
    pub fn matches(&self, record: &ModelRecord) -> bool {
        if let Some(needle) = non_empty(&self.name_contains) {
            if !contains_ignore_case(record.name.as_deref(), needle) {
                return false;
            }
        }

        if let Some(needle) = non_empty(&self.description_contains) {
            if !contains_ignore_case(record.description.as_deref(), needle) {
                return false;
            }
        }

        if !self
            .capabilities
            .iter()
            .all(|wanted| record.capabilities.contains(wanted))
        {
            return false;
        }

        self.sizes.is_empty() || self.sizes.iter().any(|wanted| record.sizes.contains(wanted))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

/// Filtered view of a snapshot
///
/// Serializes with the snapshot's field names; `total_models` counts the
/// records in this view, not in the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelQueryResult<'a> {
    pub last_updated: DateTime<Utc>,
    pub total_pages: u32,
    pub total_models: usize,
    pub models: Vec<&'a ModelRecord>,
}

impl CrawlDataset {
    /// Records matching `filter`, in snapshot order, after pagination
    ///
    /// `offset` records are skipped first. A `limit` of `None` or zero
    /// returns everything after the offset.
    pub fn filter(
        &self,
        filter: &ModelFilter,
        limit: Option<usize>,
        offset: usize,
    ) -> ModelQueryResult<'_> {
        let matching = self.models.iter().filter(|record| filter.matches(record)).skip(offset);
        let models: Vec<&ModelRecord> = match limit.filter(|&l| l > 0) {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        };

        ModelQueryResult {
            last_updated: self.last_updated,
            total_pages: self.total_pages,
            total_models: models.len(),
            models,
        }
    }

    /// First record whose name equals `name` exactly
    pub fn find_by_name(&self, name: &str) -> Option<&ModelRecord> {
        self.models
            .iter()
            .find(|record| record.name.as_deref() == Some(name))
    }

    /// Distinct capability tags across all records, sorted
    pub fn unique_capabilities(&self) -> Vec<String> {
        collect_sorted(self.models.iter().flat_map(|r| r.capabilities.iter()))
    }

    /// Distinct size tags across all records, sorted
    pub fn unique_sizes(&self) -> Vec<String> {
        collect_sorted(self.models.iter().flat_map(|r| r.sizes.iter()))
    }
}

fn collect_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}
