//! Search engine backends.

use std::future::Future;
use std::sync::LazyLock;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use url::Url;

use crate::error_handling::SearchError;
use crate::fetch::{parse_retry_after, RequestHeaders};
use crate::search::types::RawSearchResult;
use crate::utils::parse_selector_unsafe;
use crate::utils::sanitize::normalize_whitespace;

static RESULT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(".result", "RESULT_SELECTOR"));
static RESULT_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a.result__a", "RESULT_LINK_SELECTOR"));

/// Markers of the engine's bot-check page.
const ANOMALY_MARKERS: &[&str] = &["anomaly-modal", "bots use duckduckgo too"];

/// Issues one query and returns the raw result entries.
///
/// Implementations report throttling as [`SearchError::RateLimited`]; the
/// search client retries only that variant.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        client: &reqwest::Client,
        query: &str,
        user_agent: &str,
    ) -> impl Future<Output = Result<Vec<RawSearchResult>, SearchError>> + Send;
}

/// DuckDuckGo's script-free HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoBackend {
    endpoint: Url,
}

impl DuckDuckGoBackend {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl SearchBackend for DuckDuckGoBackend {
    async fn search(
        &self,
        client: &reqwest::Client,
        query: &str,
        user_agent: &str,
    ) -> Result<Vec<RawSearchResult>, SearchError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .finish();
        let request = RequestHeaders::apply_to_search_request(
            client.post(self.endpoint.clone()),
            user_agent,
        )
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body);

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::ACCEPTED {
            return Err(SearchError::RateLimited {
                reason: format!("HTTP {}", status),
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            return Err(SearchError::Http(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        parse_results(decode_page(&bytes)?, &self.endpoint)
    }
}

/// Result pages are UTF-8; anything else is not a page we can read.
fn decode_page(bytes: &[u8]) -> Result<&str, SearchError> {
    std::str::from_utf8(bytes)
        .map_err(|e| SearchError::Parse(format!("result page is not UTF-8: {}", e)))
}

/// Extracts result entries from a result page (sync: the parsed tree is not `Send`).
pub(crate) fn parse_results(html: &str, base: &Url) -> Result<Vec<RawSearchResult>, SearchError> {
    let lowered = html.to_lowercase();
    if let Some(marker) = ANOMALY_MARKERS.iter().find(|m| lowered.contains(*m)) {
        return Err(SearchError::RateLimited {
            reason: format!("anomaly page ({})", marker),
            retry_after: None,
        });
    }

    let document = Html::parse_document(html);
    let mut results = Vec::new();
    for result in document.select(&RESULT_SELECTOR) {
        if result
            .value()
            .classes()
            .any(|class| class == "result--ad")
        {
            continue;
        }
        let Some(anchor) = result.select(&RESULT_LINK_SELECTOR).next() else {
            continue;
        };
        let title = normalize_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
        let link = anchor
            .value()
            .attr("href")
            .map(|href| resolve_result_link(href, base))
            .unwrap_or_default();
        results.push(RawSearchResult { title, link });
    }
    Ok(results)
}

/// Unwraps the engine's redirect links (`/l/?uddg=<target>`) to the target URL.
fn resolve_result_link(href: &str, base: &Url) -> String {
    let Ok(resolved) = base.join(href.trim()) else {
        return href.trim().to_string();
    };
    resolved
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
        .unwrap_or_else(|| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://html.duckduckgo.com/html/").expect("test URL should parse")
    }

    #[test]
    fn test_parse_results_unwraps_redirects_and_skips_ads() {
        let html = r#"
            <div class="result results_links">
              <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.g2.com%2Fproducts%2Facme%2Freviews&rut=abc">Acme Reviews   2024</a></h2>
            </div>
            <div class="result result--ad">
              <a class="result__a" href="https://ads.example/acme">Sponsored</a>
            </div>
            <div class="result">
              <a class="result__a" href="https://www.capterra.com/p/1/Acme/">Acme | Capterra</a>
            </div>"#;
        let results = parse_results(html, &base()).expect("page should parse");
        assert_eq!(
            results,
            vec![
                RawSearchResult {
                    title: "Acme Reviews 2024".to_string(),
                    link: "https://www.g2.com/products/acme/reviews".to_string(),
                },
                RawSearchResult {
                    title: "Acme | Capterra".to_string(),
                    link: "https://www.capterra.com/p/1/Acme/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_results_detects_anomaly_page() {
        let html = r#"<div class="anomaly-modal__title">Unfortunately, bots use DuckDuckGo too.</div>"#;
        assert!(matches!(
            parse_results(html, &base()),
            Err(SearchError::RateLimited {
                retry_after: None,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_results_empty_page() {
        let results = parse_results("<html><body>No results.</body></html>", &base())
            .expect("page should parse");
        assert!(results.is_empty());
    }

    #[test]
    fn test_non_utf8_page_is_parse_error() {
        assert!(matches!(
            decode_page(&[0x3c, 0x70, 0x3e, 0xff, 0xfe]),
            Err(SearchError::Parse(_))
        ));
        assert_eq!(decode_page(b"<p>ok</p>"), Ok("<p>ok</p>"));
    }
}
