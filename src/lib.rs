//! Catalog-Snapshot: a paginated catalog crawler
//!
//! This crate walks a dynamically rendered catalog listing page by page,
//! extracts one structured record per listing entry, and writes the
//! aggregate to a JSON snapshot with provenance metadata.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod renderer;
pub mod state;

use thiserror::Error;

/// Main error type for Catalog-Snapshot operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Renderer error: {0}")]
    Render(#[from] renderer::RenderError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Snapshot operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{CrawlDataset, ModelFilter, ModelRecord, PageResult};
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, StopReason};
pub use output::{load_snapshot, save_snapshot};
