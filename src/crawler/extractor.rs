//! Record extraction for a single listing item
//!
//! Each listing item wraps an anchor with two child blocks: the first holds
//! the title heading and description paragraph, the second holds the
//! capability and size tags.

use crate::catalog::ModelRecord;
use crate::renderer::{ElementHandle, ExtractError};
use url::Url;

const ANCHOR_SELECTOR: &str = "a";
const NAME_SELECTOR: &str = "a > div:first-child > h2";
const DESCRIPTION_SELECTOR: &str = "a > div:first-child > p";
const CAPABILITY_SELECTOR: &str = "a > div:nth-child(2) [x-test-capability]";
const SIZE_SELECTOR: &str = "a > div:nth-child(2) [x-test-size]";

/// Maps one listing item to a [`ModelRecord`]
///
/// Returns `Ok(None)` when the item has no anchor; such items carry no
/// catalog entry. Fields that don't match degrade to `None` or an empty
/// list without affecting the other fields. Validity (non-empty `sizes`)
/// is left to the caller.
///
/// # Example
///
/// ```
/// use catalog_snapshot::crawler::extract_record;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_fragment(
///     r#"<li><a href="/library/llama3"><div><h2>llama3</h2></div>
///        <div><span x-test-size>8b</span></div></a></li>"#,
/// );
/// let origin = Url::parse("https://ollama.com").unwrap();
/// let record = extract_record(&html.root_element(), &origin).unwrap().unwrap();
/// assert_eq!(record.sizes, vec!["8b"]);
/// ```
pub fn extract_record<E: ElementHandle>(
    item: &E,
    origin: &Url,
) -> Result<Option<ModelRecord>, ExtractError> {
    let anchor = match item.query_one(ANCHOR_SELECTOR)? {
        Some(anchor) => anchor,
        None => return Ok(None),
    };

    let url = anchor
        .attribute("href")
        .and_then(|href| resolve_href(&href, origin));

    let name = first_text(item, NAME_SELECTOR)?;
    let description = first_text(item, DESCRIPTION_SELECTOR)?;
    let capabilities = all_texts(item, CAPABILITY_SELECTOR)?;
    let sizes = all_texts(item, SIZE_SELECTOR)?;

    Ok(Some(ModelRecord {
        name,
        description,
        capabilities,
        sizes,
        url,
    }))
}

/// Resolves a record link against the catalog origin
fn resolve_href(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match origin.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!("Unresolvable record link '{}': {}", href, e);
            None
        }
    }
}

/// Trimmed text of the first match, `None` if absent or without text
fn first_text<E: ElementHandle>(
    item: &E,
    selector: &str,
) -> Result<Option<String>, ExtractError> {
    Ok(item
        .query_one(selector)?
        .and_then(|element| element.text_content())
        .and_then(trimmed))
}

/// Trimmed text of every match in document order, skipping tags without text
fn all_texts<E: ElementHandle>(item: &E, selector: &str) -> Result<Vec<String>, ExtractError> {
    Ok(item
        .query_all(selector)?
        .iter()
        .filter_map(|element| element.text_content())
        .filter_map(trimmed)
        .collect())
}

/// Only an empty text node counts as missing; whitespace trims to `""`
fn trimmed(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.trim().to_string())
    }
}
