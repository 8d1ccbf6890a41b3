//! company_profiler library: company profiles from public web presence
//!
//! This library fetches a company's website (seed page plus a fixed set of
//! subpages such as `about` and `team`), extracts page text, contact details,
//! leadership entries and internal links, tags the technologies the site uses,
//! classifies its text into SWOT categories, and searches third-party review
//! sites for mentions of the company.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use company_profiler::initialization::init_client;
//! use company_profiler::{Aggregator, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     request_delay_seconds: 0.5,
//!     ..Default::default()
//! };
//! let client = init_client(&config)?;
//! let aggregator = Aggregator::new(client, Arc::new(config))?;
//!
//! match aggregator.build_profile("https://example.com", Some("Example"), None).await {
//!     Ok(profile) => println!("{} leaders found", profile.leadership.len()),
//!     Err(e) => eprintln!("{}: {}", e.error_kind, e.message),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Dynamic (browser) fetches also need a
//! local Chrome or Chromium installation.

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod parse;
pub mod profile;
pub mod search;
mod user_agent;
mod utils;

// Re-export public API
pub use config::{Cli, Config, LogFormat, LogLevel, SiteSearchConfig};
pub use error_handling::{ErrorKind, ProfileError};
pub use fetch::{FetchMode, Fetcher, PageRecord};
pub use profile::{Aggregator, CompanyProfile};
pub use search::{ReviewSnippet, SearchClient};
pub use utils::{RetryPolicy, RetryState};
