//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients with proper
//! configuration for page fetching and proxied search requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};

fn base_builder(config: &Config) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
}

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - Timeout from `requestTimeoutSeconds`
/// - TCP connect timeout of `TCP_CONNECT_TIMEOUT_SECS`
/// - Redirect following enabled (up to `MAX_REDIRECT_HOPS` hops)
///
/// The user agent is set per request so it can rotate.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = base_builder(config).build()?;
    Ok(Arc::new(client))
}

/// Builds a one-off client routed through `proxy_url` (all schemes).
///
/// Used by the search client, which rotates proxies per attempt.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the proxy URL is invalid or client creation fails.
pub fn init_proxied_client(
    config: &Config,
    proxy_url: &str,
) -> Result<reqwest::Client, reqwest::Error> {
    let proxy = reqwest::Proxy::all(proxy_url)?;
    base_builder(config).proxy(proxy).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_defaults() {
        assert!(init_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_init_proxied_client_valid_proxy() {
        assert!(init_proxied_client(&Config::default(), "http://127.0.0.1:3128").is_ok());
    }

    #[test]
    fn test_init_proxied_client_invalid_proxy() {
        assert!(init_proxied_client(&Config::default(), "::not a url::").is_err());
    }
}
