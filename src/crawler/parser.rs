//! Listing page parsing
//!
//! Turns a rendered listing page into a [`PageResult`]:
//! - enumerates the raw listing items
//! - recognizes the empty and "no results" placeholder layouts
//! - runs record extraction on every item and keeps the valid records

use crate::catalog::PageResult;
use crate::crawler::extractor::extract_record;
use crate::renderer::{ElementHandle, RenderedDocument};
use url::Url;

/// Container that marks the listing as rendered
pub const LIST_SELECTOR: &str = r#"ul[role="list"]"#;

/// One raw listing item
pub const ITEM_SELECTOR: &str = r#"ul[role="list"] > li"#;

/// Placeholder text the listing renders instead of an empty list
pub const SENTINEL_TEXT: &str = "No models found";

/// Parses a rendered listing page
///
/// # Example
///
/// ```
/// use catalog_snapshot::crawler::parse_listing;
/// use catalog_snapshot::renderer::RenderedDocument;
/// use url::Url;
///
/// let document = RenderedDocument::new(
///     "https://ollama.com/search?page=9",
///     r#"<ul role="list"><li>No models found</li></ul>"#,
/// );
/// let origin = Url::parse("https://ollama.com").unwrap();
/// let page = parse_listing(&document, &origin);
/// assert_eq!(page.raw_item_count, 1);
/// assert!(page.records.is_empty());
/// ```
pub fn parse_listing(document: &RenderedDocument, origin: &Url) -> PageResult {
    let html = document.parse();
    extract_page(&html.root_element(), origin)
}

/// Builds a [`PageResult`] from the items under `root`
///
/// Empty and placeholder pages skip record extraction entirely. A single
/// item that fails extraction is logged and skipped; its siblings are
/// still processed.
pub fn extract_page<E: ElementHandle>(root: &E, origin: &Url) -> PageResult {
    let items = match root.query_all(ITEM_SELECTOR) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Failed to enumerate listing items: {}", e);
            Vec::new()
        }
    };

    let mut page = PageResult {
        raw_item_count: items.len(),
        first_item_text: items.first().and_then(|item| item.text_content()),
        ..PageResult::default()
    };

    if page.raw_item_count == 0 || is_sentinel_page(&page) {
        return page;
    }

    for (index, item) in items.iter().enumerate() {
        match extract_record(item, origin) {
            Ok(Some(record)) if record.is_valid() => page.records.push(record),
            Ok(Some(record)) => {
                tracing::debug!(
                    "Dropping item {} ({}): no size variants",
                    index,
                    record.name.as_deref().unwrap_or("unnamed")
                );
                page.rejected_count += 1;
            }
            Ok(None) => {
                tracing::debug!("Dropping item {}: no anchor", index);
                page.rejected_count += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to extract item {}: {}", index, e);
                page.rejected_count += 1;
            }
        }
    }

    page
}

/// Returns true if the page is the single-item "no results" placeholder
pub fn is_sentinel_page(page: &PageResult) -> bool {
    page.raw_item_count == 1
        && page
            .first_item_text
            .as_deref()
            .is_some_and(|text| text.contains(SENTINEL_TEXT))
}
