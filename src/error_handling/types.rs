//! Error type definitions.
//!
//! This module defines the error taxonomy shared by the fetcher, the search
//! client and the aggregator, plus the typed errors each of them returns.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::ConfigError;
use crate::utils::sanitize::sanitize_and_truncate_error_message;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error loading or validating the configuration.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Categories of failure reported on page records and profile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    InvalidUrl,
    Timeout,
    TooManyRedirects,
    /// Non-success HTTP status (after retries, when the status was retryable)
    HttpError(u16),
    DnsResolutionFailed,
    ConnectionRefused,
    ParseFailed,
    UnsupportedContentType,
    RateLimited,
    Unexpected,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::HttpError(status) => write!(f, "{} ({})", self.as_str(), status),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::Timeout => "timeout",
            ErrorKind::TooManyRedirects => "too_many_redirects",
            ErrorKind::HttpError(_) => "http_error",
            ErrorKind::DnsResolutionFailed => "dns_resolution_failed",
            ErrorKind::ConnectionRefused => "connection_refused",
            ErrorKind::ParseFailed => "parse_failed",
            ErrorKind::UnsupportedContentType => "unsupported_content_type",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unexpected => "unexpected",
        }
    }

    /// Whether a seed page failing with this kind makes the whole profile fail.
    ///
    /// Parse and content-type failures still prove the site is reachable, so
    /// they degrade fields instead.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidUrl
                | ErrorKind::Timeout
                | ErrorKind::TooManyRedirects
                | ErrorKind::HttpError(_)
                | ErrorKind::DnsResolutionFailed
                | ErrorKind::ConnectionRefused
                | ErrorKind::Unexpected
        )
    }
}

/// Error returned by a single fetch strategy.
///
/// Folded into `PageRecord::error_kind` / `PageRecord::error_detail` at the
/// fetcher boundary; never escapes to callers as an `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl FetchError {
    /// Builds an error with a sanitized, length-bounded detail message.
    pub fn new(kind: ErrorKind, detail: impl AsRef<str>) -> Self {
        Self {
            kind,
            detail: sanitize_and_truncate_error_message(detail.as_ref()),
        }
    }
}

/// Error types for a single search query attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The engine signalled throttling (HTTP 429/202 or an anomaly page).
    #[error("Search rate limited: {reason}")]
    RateLimited {
        reason: String,
        /// Server-provided wait hint, if any
        retry_after: Option<Duration>,
    },

    /// The engine answered with a non-success status.
    #[error("Search HTTP error: {0}")]
    Http(u16),

    /// The request never produced a response.
    #[error("Search transport error: {0}")]
    Transport(String),

    /// The response could not be interpreted as a result page.
    #[error("Search parse error: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::RateLimited { .. } => ErrorKind::RateLimited,
            SearchError::Http(status) => ErrorKind::HttpError(*status),
            SearchError::Transport(_) => ErrorKind::Unexpected,
            SearchError::Parse(_) => ErrorKind::ParseFailed,
        }
    }
}

/// Total-failure response of a profile request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{error_kind}: {message}")]
pub struct ProfileError {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl ProfileError {
    pub fn new(error_kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            error_kind,
            message: sanitize_and_truncate_error_message(message.as_ref()),
        }
    }
}

impl From<FetchError> for ProfileError {
    fn from(err: FetchError) -> Self {
        Self {
            error_kind: err.kind,
            message: err.detail,
        }
    }
}
