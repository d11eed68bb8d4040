//! Statistics generation from a snapshot
//!
//! This module provides functionality for summarizing and displaying
//! the contents of a crawl snapshot.

use crate::catalog::CrawlDataset;
use std::collections::HashMap;

/// Snapshot statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStatistics {
    /// When the snapshot was finalized (RFC 3339)
    pub last_updated: String,

    /// Pages that contributed records
    pub total_pages: u32,

    /// Number of records in the snapshot
    pub total_models: usize,

    /// Records with no description
    pub models_without_description: usize,

    /// Sum of size variants across all records
    pub total_size_variants: usize,

    /// Capability tags and how many records carry them, most common first
    pub capabilities: Vec<(String, usize)>,
}

impl SnapshotStatistics {
    /// Computes statistics for a dataset
    pub fn from_dataset(dataset: &CrawlDataset) -> Self {
        let mut capability_counts: HashMap<&str, usize> = HashMap::new();
        for model in &dataset.models {
            for capability in &model.capabilities {
                *capability_counts.entry(capability.as_str()).or_insert(0) += 1;
            }
        }

        let mut capabilities: Vec<(String, usize)> = capability_counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        capabilities.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            last_updated: dataset.last_updated.to_rfc3339(),
            total_pages: dataset.total_pages,
            total_models: dataset.models.len(),
            models_without_description: dataset
                .models
                .iter()
                .filter(|m| m.description.is_none())
                .count(),
            total_size_variants: dataset.models.iter().map(|m| m.sizes.len()).sum(),
            capabilities,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SnapshotStatistics) {
    println!("=== Snapshot Statistics ===\n");

    println!("Overview:");
    println!("  Last updated: {}", stats.last_updated);
    println!("  Pages crawled: {}", stats.total_pages);
    println!("  Models: {}", stats.total_models);
    println!("  Size variants: {}", stats.total_size_variants);
    println!(
        "  Models without description: {}",
        stats.models_without_description
    );
    println!();

    if !stats.capabilities.is_empty() {
        println!("Capabilities:");
        for (capability, count) in &stats.capabilities {
            let percentage = if stats.total_models > 0 {
                (*count as f64 / stats.total_models as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", capability, count, percentage);
        }
        println!();
    }
}
