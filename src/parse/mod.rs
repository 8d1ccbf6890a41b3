//! HTML parsing and content extraction.
//!
//! This module turns raw HTML into typed content:
//! - Title, meta description, headings, paragraphs and visible text
//! - Contact identifiers (emails, phone numbers)
//! - Leadership/team entries
//! - Outgoing links
//!
//! Parsing tries the full-document parser first and falls back to the lenient
//! fragment parser. Extraction never fails past this module: a sub-extraction
//! that panics degrades to its empty value.

mod contacts;
mod dom;
mod html;
mod leadership;
mod links;

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use scraper::node::Node;
use scraper::Html;
use url::Url;

use crate::config::{MAX_DOCUMENT_PARSE_ERRORS, MAX_RAW_SNIPPET_CHARS};
use crate::error_handling::{ErrorKind, FetchError};
use crate::utils::sanitize::truncate_chars;

// Re-export public API
pub use contacts::{extract_contacts, extract_contacts_from_text, Contacts};
pub use dom::{ClassMatch, DomNode, SelectorSpec};
pub use html::{
    bounded_combined_text, extract_headings, extract_meta_description, extract_paragraphs,
    extract_title, extract_visible_text,
};
pub use leadership::{extract_leadership, LeadershipEntry};
pub use links::{extract_links, internal_links};

/// Everything extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    /// Visible text, bounded to `MAX_COMBINED_TEXT_CHARS`
    pub combined_text: String,
    pub contacts: Contacts,
    pub leadership: Vec<LeadershipEntry>,
    /// Absolute http(s) links, resolved against the page URL
    pub links: BTreeSet<String>,
}

/// Why neither parser produced a usable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub detail: String,
    /// Leading part of the raw input, when there was any
    pub raw_snippet: Option<String>,
}

impl From<ParseFailure> for FetchError {
    fn from(failure: ParseFailure) -> Self {
        FetchError::new(ErrorKind::ParseFailed, failure.detail)
    }
}

/// Parses raw HTML: full-document parser first, lenient fragment parser second.
pub fn parse_html(raw: &str) -> Result<Html, ParseFailure> {
    parse_with_fallback(raw, Html::parse_document, Html::parse_fragment)
}

fn parse_with_fallback(
    raw: &str,
    primary: fn(&str) -> Html,
    fallback: fn(&str) -> Html,
) -> Result<Html, ParseFailure> {
    let primary_error = match try_parse(raw, primary) {
        Ok(document) => return Ok(document),
        Err(reason) => reason,
    };
    log::debug!(
        "Document parser rejected input ({}), trying fragment parser",
        primary_error
    );

    match try_parse(raw, fallback) {
        Ok(fragment) => Ok(fragment),
        Err(fallback_error) => {
            let trimmed = raw.trim();
            Err(ParseFailure {
                detail: format!(
                    "document parser: {}; fragment parser: {}",
                    primary_error, fallback_error
                ),
                raw_snippet: (!trimmed.is_empty())
                    .then(|| truncate_chars(trimmed, MAX_RAW_SNIPPET_CHARS).to_string()),
            })
        }
    }
}

/// Runs one parser and decides whether its output is usable.
fn try_parse(raw: &str, parser: fn(&str) -> Html) -> Result<Html, String> {
    let document = catch_unwind(|| parser(raw)).map_err(|_| "parser panicked".to_string())?;
    if document.errors.len() > MAX_DOCUMENT_PARSE_ERRORS {
        return Err(format!("{} parse errors", document.errors.len()));
    }
    let has_content = document.tree.root().descendants().any(|node| match node.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(element) => !is_skeleton(element.name()),
        _ => false,
    });
    if !has_content {
        return Err("no content".to_string());
    }
    Ok(document)
}

/// Elements the parsers synthesize even for empty input.
fn is_skeleton(name: &str) -> bool {
    matches!(name, "html" | "head" | "body")
}

/// Extracts all page content from a parsed document.
pub fn extract(document: &Html, source_url: &Url) -> ExtractedContent {
    let visible_text = degrade("visible text", source_url, || extract_visible_text(document));

    ExtractedContent {
        title: degrade("title", source_url, || extract_title(document)),
        meta_description: degrade("meta description", source_url, || {
            extract_meta_description(document)
        }),
        headings: degrade("headings", source_url, || extract_headings(document)),
        paragraphs: degrade("paragraphs", source_url, || extract_paragraphs(document)),
        combined_text: bounded_combined_text(&visible_text),
        contacts: degrade("contacts", source_url, || {
            extract_contacts(document, &visible_text)
        }),
        leadership: degrade("leadership", source_url, || {
            extract_leadership(document.root_element(), source_url.as_str())
        }),
        links: degrade("links", source_url, || extract_links(document, source_url)),
    }
}

/// Parses and extracts in one synchronous step (the parsed tree is not `Send`).
pub fn parse_and_extract(raw: &str, source_url: &Url) -> Result<ExtractedContent, ParseFailure> {
    let document = parse_html(raw)?;
    Ok(extract(&document, source_url))
}

/// Runs one sub-extraction, replacing a panic with the empty value.
fn degrade<T: Default>(what: &str, source_url: &Url, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::warn!(
                "{} extraction failed on {}, using empty value",
                what,
                source_url
            );
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
