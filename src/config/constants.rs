//! Configuration constants.
//!
//! This module defines the operational limits and defaults used throughout the
//! crate: retry budgets, timeouts, extraction caps and the subpaths visited for
//! every profile.

use std::time::Duration;

// Fetcher defaults
/// Maximum number of retries for a static fetch (not counting the first attempt)
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Backoff factor in seconds: the n-th retry waits `factor * 2^(n-1)` seconds
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 1.0;
/// Per-request timeout in seconds (HTTP client and browser navigation base)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
/// Fixed wait after browser navigation so client-side rendering can finish
pub const DEFAULT_DYNAMIC_SETTLE_SECS: f64 = 5.0;
/// Delay before every page fetch
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 1.0;

// Search defaults
/// Base delay before every review search query (jittered)
pub const DEFAULT_REVIEW_SEARCH_DELAY_SECS: f64 = 2.0;
/// Results kept per review site when the site does not set its own cap
pub const DEFAULT_MAX_REVIEW_RESULTS_PER_SITE: usize = 5;
/// Unique results after which the review scan stops
pub const DEFAULT_MAX_TOTAL_REVIEW_RESULTS: usize = 20;
/// Base backoff after a search rate-limit signal, doubled per attempt
pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: f64 = 60.0;
/// Attempts per search query before a rate-limited site is skipped
pub const DEFAULT_MAX_RATE_LIMIT_RETRIES: u32 = 3;
/// DuckDuckGo HTML endpoint used by the default search backend
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

// Retry strategy
/// Upper bound for any single backoff interval (static fetch and Retry-After hints)
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);
/// Jitter range applied to the search delay (multiplicative: `1 + U(low, high)`)
pub const SEARCH_JITTER_RANGE: (f64, f64) = (-0.2, 0.5);
/// Status codes that trigger an automatic static-fetch retry
pub const RETRYABLE_STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Extra navigation budget for the browser on top of the request timeout
pub const DYNAMIC_NAVIGATION_GRACE_SECS: u64 = 15;

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// Response and body size limits
/// Maximum response body size in bytes (5MB)
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

// Extraction limits
/// Maximum combined page text kept per page, in characters
pub const MAX_COMBINED_TEXT_CHARS: usize = 50_000;
/// Maximum raw HTML kept when parsing failed, in characters
pub const MAX_RAW_SNIPPET_CHARS: usize = 1_000;
/// Maximum number of headings kept per page
pub const MAX_HEADINGS: usize = 50;
/// Maximum number of paragraphs kept per page
pub const MAX_PARAGRAPHS: usize = 100;
/// Maximum leadership entries per page and per profile
pub const MAX_LEADERSHIP_ENTRIES: usize = 25;
/// Bio paragraphs must be longer than this (characters)
pub const MIN_BIO_PARAGRAPH_CHARS: usize = 30;
/// Paragraphs joined into one bio snippet
pub const MAX_BIO_PARAGRAPHS: usize = 2;
/// Rendered sources shorter than this are treated as empty
pub const MIN_RENDERED_SOURCE_CHARS: usize = 200;
/// Static pages with less visible text than this are candidates for a dynamic refetch
pub const MIN_STATIC_TEXT_CHARS: usize = 200;
/// Parse errors above which the strict document parse is rejected
pub const MAX_DOCUMENT_PARSE_ERRORS: usize = 500;

// Error message limits
/// Maximum error detail length in characters
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

/// Subpaths fetched after the seed URL, resolved against the seed's final URL.
pub const SUBPATHS: &[&str] = &[
    "about",
    "about-us",
    "team",
    "our-team",
    "leadership",
    "management",
    "contact",
    "contact-us",
];

/// Class-name fragments that mark a likely person/team container.
pub const LEADERSHIP_CONTAINER_CLASSES: &[&str] = &[
    "team-member",
    "leadership-profile",
    "person-card",
    "bio-item",
    "member-info",
];

/// Default User-Agent string for HTTP requests when the pool is empty.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
