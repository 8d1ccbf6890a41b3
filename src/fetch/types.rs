//! Fetch result types.

use serde::Serialize;

use crate::error_handling::{ErrorKind, FetchError};
use crate::parse::ExtractedContent;

/// Retrieval strategy for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET, no script execution
    Static,
    /// Headless browser render
    Dynamic,
}

/// Normalized outcome of fetching one page.
///
/// `success` is true iff HTML was retrieved and parsed without a terminal
/// error. `raw_snippet` is only set when parsing failed but raw text existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Final URL after redirects (the input URL when no request was made)
    pub url: String,
    pub success: bool,
    pub mode: FetchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub combined_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_snippet: Option<String>,
    /// Requests issued for this page (0 when the URL was rejected up front)
    pub attempts: u32,
}

impl PageRecord {
    pub(crate) fn succeeded(
        url: String,
        mode: FetchMode,
        status_code: Option<u16>,
        attempts: u32,
        content: &ExtractedContent,
    ) -> Self {
        Self {
            url,
            success: true,
            mode,
            status_code,
            error_kind: None,
            error_detail: None,
            title: content.title.clone(),
            meta_description: content.meta_description.clone(),
            headings: content.headings.clone(),
            paragraphs: content.paragraphs.clone(),
            combined_text: content.combined_text.clone(),
            raw_snippet: None,
            attempts,
        }
    }

    pub(crate) fn failed(
        url: String,
        mode: FetchMode,
        status_code: Option<u16>,
        attempts: u32,
        error: FetchError,
        raw_snippet: Option<String>,
    ) -> Self {
        Self {
            url,
            success: false,
            mode,
            status_code,
            error_kind: Some(error.kind),
            error_detail: Some(error.detail),
            title: String::new(),
            meta_description: String::new(),
            headings: Vec::new(),
            paragraphs: Vec::new(),
            combined_text: String::new(),
            raw_snippet,
            attempts,
        }
    }
}

/// A page record plus everything the aggregator needs from the same fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub record: PageRecord,
    /// Raw HTML whenever a body was retrieved, parsed or not
    pub raw_html: Option<String>,
    /// Extracted content, present iff `record.success`
    pub content: Option<ExtractedContent>,
}

/// What a fetch strategy hands back before parsing.
#[derive(Debug)]
pub(crate) struct RawFetch {
    pub final_url: String,
    pub status_code: Option<u16>,
    pub attempts: u32,
    pub body: Result<String, FetchError>,
}
