//! Configuration types.
//!
//! This module defines the immutable configuration value handed to the fetcher,
//! the search client and the aggregator at construction time, together with the
//! logging options used by the CLI.

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::*;
use crate::config::sites::default_site_configs;
use crate::user_agent::default_user_agent_pool;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// One review site searched by the [`SearchClient`](crate::search::SearchClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSearchConfig {
    /// Key reported as `sourceSite` on every snippet found on this site
    pub key: String,
    /// Domain used in the `site:` operator
    pub domain: String,
    /// Lower is searched first
    pub priority: i32,
    /// Appended verbatim to every query for this site (e.g. `" reviews"`)
    #[serde(default)]
    pub query_suffix: String,
    /// Results kept per query on this site
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_REVIEW_RESULTS_PER_SITE
}

/// Errors produced while loading or validating a [`Config`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`Config`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its accepted range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Library configuration.
///
/// Built once per process (from defaults, an optional JSON file and CLI flags)
/// and shared read-only behind an `Arc`; nothing mutates it during a request.
///
/// # Examples
///
/// ```no_run
/// use company_profiler::Config;
///
/// let config = Config {
///     max_retries: 2,
///     request_delay_seconds: 0.5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Retries for retryable HTTP statuses (not counting the first attempt)
    pub max_retries: u32,

    /// Exponential backoff factor in seconds
    pub retry_backoff_factor: f64,

    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Fixed wait after browser navigation, in seconds
    pub dynamic_settle_seconds: f64,

    /// Delay before every page fetch, in seconds
    pub request_delay_seconds: f64,

    /// Base delay before every review search query, in seconds
    pub review_search_delay_seconds: f64,

    /// Fallback per-site result cap
    pub max_review_results_per_site: usize,

    /// Global cap on unique review snippets
    pub max_total_review_results: usize,

    /// Base backoff after a search rate-limit signal, in seconds
    pub rate_limit_backoff_seconds: f64,

    /// Attempts per search query while rate limited
    pub max_rate_limit_retries: u32,

    /// Review sites, searched in ascending priority
    pub site_configs: Vec<SiteSearchConfig>,

    /// Outbound proxies rotated per search attempt (empty = direct)
    pub proxy_pool: Vec<String>,

    /// User agents rotated per request
    pub user_agent_pool: Vec<String>,

    /// Search endpoint used by the default backend
    pub search_endpoint: String,

    /// Refetch script-rendered pages with the headless browser
    pub dynamic_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            dynamic_settle_seconds: DEFAULT_DYNAMIC_SETTLE_SECS,
            request_delay_seconds: DEFAULT_REQUEST_DELAY_SECS,
            review_search_delay_seconds: DEFAULT_REVIEW_SEARCH_DELAY_SECS,
            max_review_results_per_site: DEFAULT_MAX_REVIEW_RESULTS_PER_SITE,
            max_total_review_results: DEFAULT_MAX_TOTAL_REVIEW_RESULTS,
            rate_limit_backoff_seconds: DEFAULT_RATE_LIMIT_BACKOFF_SECS,
            max_rate_limit_retries: DEFAULT_MAX_RATE_LIMIT_RETRIES,
            site_configs: default_site_configs(),
            proxy_pool: Vec::new(),
            user_agent_pool: default_user_agent_pool(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            dynamic_fallback: false,
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every numeric option is in range and every proxy parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("retryBackoffFactor", self.retry_backoff_factor),
            ("dynamicSettleSeconds", self.dynamic_settle_seconds),
            ("requestDelaySeconds", self.request_delay_seconds),
            ("reviewSearchDelaySeconds", self.review_search_delay_seconds),
            ("rateLimitBackoffSeconds", self.rate_limit_backoff_seconds),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "requestTimeoutSeconds must be greater than zero".to_string(),
            ));
        }
        if self.max_rate_limit_retries == 0 {
            return Err(ConfigError::Invalid(
                "maxRateLimitRetries must be at least 1".to_string(),
            ));
        }
        for site in &self.site_configs {
            if site.domain.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "site '{}' has an empty domain",
                    site.key
                )));
            }
        }
        for proxy in &self.proxy_pool {
            if url::Url::parse(proxy).is_err() {
                return Err(ConfigError::Invalid(format!("invalid proxy URL: {proxy}")));
            }
        }
        if url::Url::parse(&self.search_endpoint).is_err() {
            return Err(ConfigError::Invalid(format!(
                "invalid search endpoint: {}",
                self.search_endpoint
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        secs_f64(self.request_delay_seconds)
    }

    pub fn dynamic_settle(&self) -> Duration {
        secs_f64(self.dynamic_settle_seconds)
    }

    pub fn review_search_delay(&self) -> Duration {
        secs_f64(self.review_search_delay_seconds)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        secs_f64(self.rate_limit_backoff_seconds)
    }

    pub fn retry_backoff_base(&self) -> Duration {
        secs_f64(self.retry_backoff_factor)
    }

    /// Navigation budget for the browser: request timeout plus a fixed grace.
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds + DYNAMIC_NAVIGATION_GRACE_SECS)
    }

    /// Site configs sorted by ascending priority (stable for equal priorities).
    pub fn sites_by_priority(&self) -> Vec<SiteSearchConfig> {
        let mut sites = self.site_configs.clone();
        sites.sort_by_key(|site| site.priority);
        sites
    }
}

/// Converts validated seconds into a `Duration`, treating bad values as zero.
fn secs_f64(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout_seconds, 20);
        assert_eq!(config.max_total_review_results, 20);
        assert!(config.proxy_pool.is_empty());
        assert!(!config.user_agent_pool.is_empty());
        assert!(!config.site_configs.is_empty());
        assert!(!config.dynamic_fallback);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_delay() {
        let config = Config {
            request_delay_seconds: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            request_timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_proxy() {
        let config = Config {
            proxy_pool: vec!["not a proxy".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sites_by_priority_is_ascending() {
        let config = Config {
            site_configs: vec![
                SiteSearchConfig {
                    key: "c".to_string(),
                    domain: "c.com".to_string(),
                    priority: 3,
                    query_suffix: String::new(),
                    max_results: 5,
                },
                SiteSearchConfig {
                    key: "a".to_string(),
                    domain: "a.com".to_string(),
                    priority: 1,
                    query_suffix: String::new(),
                    max_results: 5,
                },
            ],
            ..Default::default()
        };
        let keys: Vec<_> = config
            .sites_by_priority()
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_from_json_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"{{"maxRetries": 1, "proxyPool": ["http://127.0.0.1:8080"]}}"#
        )
        .expect("Failed to write config");
        file.flush().expect("Failed to flush config");

        let config = Config::from_json_file(file.path()).expect("config should load");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.proxy_pool, vec!["http://127.0.0.1:8080".to_string()]);
        assert_eq!(config.request_timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_json_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{{ not json").expect("Failed to write config");
        file.flush().expect("Failed to flush config");

        assert!(matches!(
            Config::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_navigation_timeout_adds_grace() {
        let config = Config {
            request_timeout_seconds: 5,
            ..Default::default()
        };
        assert_eq!(
            config.navigation_timeout(),
            Duration::from_secs(5 + DYNAMIC_NAVIGATION_GRACE_SECS)
        );
    }
}
