//! HTTP request building.

/// Realistic browser request headers to reduce bot detection.
///
/// These headers mimic a modern desktop browser navigation. The user agent is
/// supplied per request so it can rotate; `Accept-Encoding` is left to reqwest.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Applies the standard page-navigation headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
        user_agent: &str,
    ) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-dest"),
                "document",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-mode"),
                "navigate",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-site"),
                "none",
            )
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
    }

    /// Headers for a search form submission (`POST`, form-encoded).
    pub(crate) fn apply_to_search_request(
        builder: reqwest::RequestBuilder,
        user_agent: &str,
    ) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
    }
}
