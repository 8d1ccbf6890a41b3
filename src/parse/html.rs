//! Basic HTML extraction utilities.
//!
//! This module provides functions to extract basic page content:
//! - Page title
//! - Meta description
//! - Headings (h1-h3) and paragraphs
//! - Visible text

use scraper::node::Node;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::{MAX_COMBINED_TEXT_CHARS, MAX_HEADINGS, MAX_PARAGRAPHS};
use crate::utils::parse_selector_unsafe;
use crate::utils::sanitize::{normalize_whitespace, truncate_chars};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "TITLE_SELECTOR"));
static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        "meta[name='description'], meta[name='Description'], meta[property='og:description']",
        "META_DESCRIPTION_SELECTOR",
    )
});
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("h1, h2, h3", "HEADING_SELECTOR"));
static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("p", "PARAGRAPH_SELECTOR"));

/// Elements whose text is never rendered.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Extracts the page title, or an empty string when the document has none.
pub fn extract_title(document: &Html) -> String {
    match document.select(&TITLE_SELECTOR).next() {
        Some(element) => normalize_whitespace(&element.text().collect::<String>()),
        None => {
            log::debug!("No title element found in document");
            String::new()
        }
    }
}

/// Extracts the meta description (`name="description"`, then `og:description`).
///
/// Returns an empty string if no non-empty description is present.
pub fn extract_meta_description(document: &Html) -> String {
    document
        .select(&META_DESCRIPTION_SELECTOR)
        .filter_map(|element| element.value().attr("content"))
        .map(normalize_whitespace)
        .find(|content| !content.is_empty())
        .unwrap_or_default()
}

/// Extracts non-empty h1-h3 texts in document order (at most `MAX_HEADINGS`).
pub fn extract_headings(document: &Html) -> Vec<String> {
    select_texts(document, &HEADING_SELECTOR, MAX_HEADINGS)
}

/// Extracts non-empty paragraph texts in document order (at most `MAX_PARAGRAPHS`).
pub fn extract_paragraphs(document: &Html) -> Vec<String> {
    select_texts(document, &PARAGRAPH_SELECTOR, MAX_PARAGRAPHS)
}

fn select_texts(document: &Html, selector: &Selector, limit: usize) -> Vec<String> {
    document
        .select(selector)
        .map(|element| normalize_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
        .take(limit)
        .collect()
}

/// Concatenates every visible text node with whitespace collapsed.
///
/// Text inside `script`, `style`, `noscript`, `template` and `head` is skipped.
/// The result is not truncated; see [`bounded_combined_text`].
pub fn extract_visible_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => INVISIBLE_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        }
    }
    normalize_whitespace(&pieces.join(" "))
}

/// Bounds visible text to `MAX_COMBINED_TEXT_CHARS` characters.
pub fn bounded_combined_text(text: &str) -> String {
    truncate_chars(text, MAX_COMBINED_TEXT_CHARS).to_string()
}
