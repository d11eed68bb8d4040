//! JSON snapshot persistence
//!
//! The snapshot is the only durable state of a run: one pretty-printed
//! JSON document, overwritten in full on every save.

use crate::catalog::CrawlDataset;
use crate::output::OutputResult;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

/// Writes `dataset` to `output_path` as indented UTF-8 JSON
///
/// Missing parent directories are created. Field order follows the
/// dataset definition, and non-ASCII text is written literally.
///
/// # Arguments
///
/// * `dataset` - The finalized crawl dataset
/// * `output_path` - Destination file; replaced if it exists
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the snapshot
/// * `Err(OutputError)` - Failed to create directories or write the file
pub fn save_snapshot(dataset: &CrawlDataset, output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut json = serde_json::to_string_pretty(dataset)?;
    json.push('\n');

    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    tracing::debug!(
        "Wrote snapshot with {} models to {}",
        dataset.total_models,
        output_path.display()
    );

    Ok(())
}

/// Reads a snapshot previously written by [`save_snapshot`]
pub fn load_snapshot(path: &Path) -> OutputResult<CrawlDataset> {
    let file = File::open(path)?;
    let dataset = serde_json::from_reader(BufReader::new(file))?;
    Ok(dataset)
}
