//! Review-site search.
//!
//! Queries a search engine for third-party review pages about a company, one
//! site at a time in priority order, with jittered pacing and rate-limit
//! backoff. The engine sits behind [`SearchBackend`] so tests and alternative
//! engines can replace the default DuckDuckGo backend.

mod backend;
mod client;
mod types;

// Re-export public API
pub use backend::{DuckDuckGoBackend, SearchBackend};
pub use client::SearchClient;
pub use types::{RawSearchResult, ReviewSnippet};
