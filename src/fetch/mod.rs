//! Page fetching.
//!
//! This module retrieves one page with one of two strategies and normalizes the
//! outcome into a [`PageRecord`]:
//! - [`FetchMode::Static`]: HTTP GET with bounded retries for transient statuses
//! - [`FetchMode::Dynamic`]: headless browser render with a fixed settle time
//!
//! Fetching never returns an error. Every failure is classified into an
//! [`ErrorKind`](crate::error_handling::ErrorKind) on the record.

mod dynamic;
mod request;
mod static_fetch;
mod types;

use std::sync::Arc;

use url::Url;

use crate::config::{Config, MIN_RENDERED_SOURCE_CHARS};
use crate::error_handling::{ErrorKind, FetchError};
use crate::parse::parse_and_extract;
use crate::user_agent::UserAgentPool;

pub(crate) use request::RequestHeaders;
pub(crate) use static_fetch::parse_retry_after;
use types::RawFetch;

// Re-export public API
pub use dynamic::{
    BrowserDriver, BrowserError, BrowserSession, ChromiumDriver, ChromiumSession, SessionGuard,
};
pub use types::{FetchMode, FetchedPage, PageRecord};

/// Retrieves pages with a shared HTTP client and a browser driver.
pub struct Fetcher<D: BrowserDriver = ChromiumDriver> {
    client: Arc<reqwest::Client>,
    config: Arc<Config>,
    user_agents: UserAgentPool,
    driver: D,
}

impl Fetcher<ChromiumDriver> {
    /// Creates a fetcher that renders dynamic pages with Chromium.
    pub fn new(client: Arc<reqwest::Client>, config: Arc<Config>) -> Self {
        let driver = ChromiumDriver::new(&config);
        Self::with_driver(client, config, driver)
    }
}

impl<D: BrowserDriver> Fetcher<D> {
    pub fn with_driver(client: Arc<reqwest::Client>, config: Arc<Config>, driver: D) -> Self {
        let user_agents = UserAgentPool::new(&config.user_agent_pool);
        Self {
            client,
            config,
            user_agents,
            driver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches one page, returning its record and the raw HTML when a body was retrieved.
    pub async fn fetch(&self, url: &str, mode: FetchMode) -> (PageRecord, Option<String>) {
        let page = self.fetch_page(url, mode).await;
        (page.record, page.raw_html)
    }

    /// Fetches one page and keeps the extracted content alongside the record.
    pub async fn fetch_page(&self, url: &str, mode: FetchMode) -> FetchedPage {
        let parsed = match validate_url(url) {
            Ok(parsed) => parsed,
            Err(error) => {
                log::warn!("Rejecting URL '{}': {}", url, error.detail);
                return FetchedPage {
                    record: PageRecord::failed(url.to_string(), mode, None, 0, error, None),
                    raw_html: None,
                    content: None,
                };
            }
        };

        tokio::time::sleep(self.config.request_delay()).await;

        // Copied out so no RNG state lives across the await
        let user_agent = self.user_agents.pick().to_string();
        let raw = match mode {
            FetchMode::Static => {
                static_fetch::fetch_static(&self.client, &self.config, &parsed, &user_agent).await
            }
            FetchMode::Dynamic => {
                dynamic::fetch_dynamic(&self.driver, &self.config, &parsed, &user_agent).await
            }
        };

        into_fetched_page(raw, mode, &parsed)
    }
}

/// Accepts absolute http(s) URLs with a host.
fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| FetchError::new(ErrorKind::InvalidUrl, format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::new(
            ErrorKind::InvalidUrl,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::new(ErrorKind::InvalidUrl, "URL has no host"));
    }
    Ok(parsed)
}

/// Parses a retrieved body and folds everything into a [`FetchedPage`].
fn into_fetched_page(raw: RawFetch, mode: FetchMode, requested: &Url) -> FetchedPage {
    let RawFetch {
        final_url,
        status_code,
        attempts,
        body,
    } = raw;

    let html = match body {
        Ok(html) => html,
        Err(error) => {
            return FetchedPage {
                record: PageRecord::failed(final_url, mode, status_code, attempts, error, None),
                raw_html: None,
                content: None,
            };
        }
    };

    let page_url = Url::parse(&final_url).unwrap_or_else(|_| requested.clone());

    if mode == FetchMode::Dynamic && html.trim().chars().count() < MIN_RENDERED_SOURCE_CHARS {
        let error = FetchError::new(
            ErrorKind::ParseFailed,
            format!(
                "rendered source shorter than {} characters",
                MIN_RENDERED_SOURCE_CHARS
            ),
        );
        let snippet = snippet_of(&html);
        return FetchedPage {
            record: PageRecord::failed(final_url, mode, status_code, attempts, error, snippet),
            raw_html: Some(html),
            content: None,
        };
    }

    match parse_and_extract(&html, &page_url) {
        Ok(content) => FetchedPage {
            record: PageRecord::succeeded(final_url, mode, status_code, attempts, &content),
            raw_html: Some(html),
            content: Some(content),
        },
        Err(failure) => {
            log::info!("Could not parse {}: {}", final_url, failure.detail);
            let snippet = failure.raw_snippet.clone();
            FetchedPage {
                record: PageRecord::failed(
                    final_url,
                    mode,
                    status_code,
                    attempts,
                    failure.into(),
                    snippet,
                ),
                raw_html: Some(html),
                content: None,
            }
        }
    }
}

fn snippet_of(html: &str) -> Option<String> {
    let trimmed = html.trim();
    (!trimmed.is_empty()).then(|| {
        crate::utils::sanitize::truncate_chars(trimmed, crate::config::MAX_RAW_SNIPPET_CHARS)
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
