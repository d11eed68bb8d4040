//! Element access capability
//!
//! Record extraction only needs four operations on a DOM element. Keeping
//! them behind a trait lets the extractor run against `scraper` elements
//! from a rendered snapshot, or against any other element source.

use scraper::{ElementRef, Selector};
use thiserror::Error;

/// Errors raised while reading a single listing item
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Element access failed: {0}")]
    Element(String),
}

/// The narrow DOM surface the record extractor depends on
pub trait ElementHandle: Sized {
    /// First descendant matching `selector`
    fn query_one(&self, selector: &str) -> Result<Option<Self>, ExtractError>;

    /// All descendants matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<Self>, ExtractError>;

    /// Concatenated text of the element and its descendants
    fn text_content(&self) -> Option<String>;

    /// Value of the named attribute
    fn attribute(&self, name: &str) -> Option<String>;
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

impl<'a> ElementHandle for ElementRef<'a> {
    fn query_one(&self, selector: &str) -> Result<Option<Self>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(self.select(&selector).next())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(self.select(&selector).collect())
    }

    fn text_content(&self) -> Option<String> {
        Some(self.text().collect())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}
