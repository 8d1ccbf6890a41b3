use serde::Serialize;

/// A third-party review-site mention of the company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnippet {
    pub title: String,
    /// Absolute http(s) URL, unique within one search
    pub link: String,
    /// Key of the site config the result was found through
    pub source_site: String,
    /// The query that first returned this link
    pub query_used: String,
}

/// One entry of a result page, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSearchResult {
    pub title: String,
    pub link: String,
}
