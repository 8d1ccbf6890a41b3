//! Review-site search orchestration.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;
use url::Url;

use crate::config::{Config, SiteSearchConfig, SEARCH_JITTER_RANGE};
use crate::error_handling::SearchError;
use crate::initialization::init_proxied_client;
use crate::search::backend::{DuckDuckGoBackend, SearchBackend};
use crate::search::types::{RawSearchResult, ReviewSnippet};
use crate::user_agent::UserAgentPool;
use crate::utils::{run_with_retry, AttemptResult, RetryPolicy, RetryState};

/// Searches review sites for mentions of a company.
pub struct SearchClient<B: SearchBackend = DuckDuckGoBackend> {
    direct_client: Arc<reqwest::Client>,
    proxied_clients: Vec<reqwest::Client>,
    config: Arc<Config>,
    user_agents: UserAgentPool,
    backend: B,
}

impl SearchClient<DuckDuckGoBackend> {
    /// Creates a client for the configured search endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or a proxy URL is invalid.
    pub fn new(client: Arc<reqwest::Client>, config: Arc<Config>) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.search_endpoint)?;
        Self::with_backend(client, config, DuckDuckGoBackend::new(endpoint))
    }
}

impl<B: SearchBackend> SearchClient<B> {
    /// Creates a client over an arbitrary backend, building one HTTP client per proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if a proxy URL cannot be turned into a client.
    pub fn with_backend(
        client: Arc<reqwest::Client>,
        config: Arc<Config>,
        backend: B,
    ) -> anyhow::Result<Self> {
        let proxied_clients = config
            .proxy_pool
            .iter()
            .map(|proxy| init_proxied_client(&config, proxy))
            .collect::<Result<Vec<_>, _>>()?;
        let user_agents = UserAgentPool::new(&config.user_agent_pool);
        Ok(Self {
            direct_client: client,
            proxied_clients,
            config,
            user_agents,
            backend,
        })
    }

    /// Finds unique review snippets for `company_name` across the configured sites.
    ///
    /// Never fails: a query that errors contributes nothing and the scan moves on.
    pub async fn search_reviews(
        &self,
        company_name: &str,
        location: Option<&str>,
    ) -> Vec<ReviewSnippet> {
        let company = company_name.trim();
        if company.is_empty() {
            log::warn!("No company name to search reviews for, skipping review search");
            return Vec::new();
        }

        let max_total = self.config.max_total_review_results;
        let mut seen: HashSet<String> = HashSet::new();
        let mut snippets: Vec<ReviewSnippet> = Vec::new();

        'sites: for site in self.config.sites_by_priority() {
            for query in build_queries(company, location, &site) {
                if snippets.len() >= max_total {
                    break 'sites;
                }
                let Some(results) = self.run_query(&query).await else {
                    continue;
                };

                let per_site = if site.max_results == 0 {
                    self.config.max_review_results_per_site
                } else {
                    site.max_results
                };
                let accepted = results
                    .into_iter()
                    .filter_map(|raw| accept_result(raw, &query))
                    .take(per_site);
                for (title, link) in accepted {
                    if snippets.len() >= max_total {
                        break;
                    }
                    if seen.insert(link.clone()) {
                        snippets.push(ReviewSnippet {
                            title,
                            link,
                            source_site: site.key.clone(),
                            query_used: query.clone(),
                        });
                    }
                }
            }
        }

        log::info!(
            "Review search for '{}' found {} unique results",
            company,
            snippets.len()
        );
        snippets
    }

    /// Runs one query through the rate-limit retry loop.
    ///
    /// Returns `None` when the query produced no usable answer.
    async fn run_query(&self, query: &str) -> Option<Vec<RawSearchResult>> {
        let policy = RetryPolicy::new(
            self.config.max_rate_limit_retries.saturating_sub(1),
            self.config.rate_limit_backoff(),
        )
        .with_max_backoff(Duration::MAX);

        let outcome = run_with_retry(&policy, |attempt| {
            // Chosen before the await: the RNG is not held across suspension points
            let (delay, client, user_agent) = self.attempt_setup(attempt);
            async move {
                tokio::time::sleep(delay).await;
                log::debug!("Search attempt {} for {}", attempt, query);
                match self.backend.search(&client, query, &user_agent).await {
                    Ok(results) => AttemptResult::Done(results),
                    Err(SearchError::RateLimited {
                        reason,
                        retry_after,
                    }) => AttemptResult::Retryable {
                        error: SearchError::RateLimited {
                            reason,
                            retry_after,
                        },
                        retry_after,
                    },
                    Err(e) => AttemptResult::Fatal(e),
                }
            }
        })
        .await;

        match outcome.result {
            Ok(results) => Some(results),
            Err(e @ SearchError::RateLimited { .. }) if outcome.state == RetryState::Exhausted => {
                log::warn!(
                    "Still rate limited after {} attempts, skipping query {}: {}",
                    outcome.attempts,
                    query,
                    e
                );
                None
            }
            Err(e) => {
                log::warn!("Search query {} failed: {}", query, e);
                None
            }
        }
    }

    /// Jittered delay, HTTP client and user agent for one attempt.
    fn attempt_setup(&self, attempt: u32) -> (Duration, reqwest::Client, String) {
        let mut rng = rand::rng();
        let (low, high) = SEARCH_JITTER_RANGE;
        let jitter = 1.0 + rng.random_range(low..high);
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let seconds =
            self.config.review_search_delay().as_secs_f64() * 2f64.powi(exponent) * jitter;
        let delay = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);

        let client = self
            .proxied_clients
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| (*self.direct_client).clone());
        (delay, client, self.user_agents.pick().to_string())
    }
}

/// Base query, then the location query when it differs.
pub(crate) fn build_queries(
    company: &str,
    location: Option<&str>,
    site: &SiteSearchConfig,
) -> Vec<String> {
    let base = format!("site:{} \"{}\"{}", site.domain, company, site.query_suffix);
    let mut queries = vec![base];
    if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
        let with_location = format!(
            "site:{} \"{}\" \"{}\"{}",
            site.domain, company, location, site.query_suffix
        );
        if !queries.contains(&with_location) {
            queries.push(with_location);
        }
    }
    queries
}

/// Keeps entries with a title and an absolute http(s) link.
fn accept_result(raw: RawSearchResult, query: &str) -> Option<(String, String)> {
    let title = raw.title.trim();
    if title.is_empty() {
        log::debug!("Dropping result without title for {}: {}", query, raw.link);
        return None;
    }
    match Url::parse(raw.link.trim()) {
        Ok(link) if matches!(link.scheme(), "http" | "https") && link.has_host() => {
            Some((title.to_string(), link.to_string()))
        }
        _ => {
            log::debug!(
                "Dropping result with unusable link for {}: '{}'",
                query,
                raw.link
            );
            None
        }
    }
}
