//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, etc.)
//! - The immutable [`Config`] value and review-site table
//! - Logging option types and the command-line interface

mod cli;
mod constants;
mod sites;
mod types;

// Re-export all constants
pub use cli::Cli;
pub use constants::*;
pub use sites::default_site_configs;
pub use types::{Config, ConfigError, LogFormat, LogLevel, SiteSearchConfig};
