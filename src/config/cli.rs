//! Command-line interface of the `company_profiler` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::types::{Config, LogFormat, LogLevel};

/// Builds a company profile from a website and prints it as JSON.
///
/// Options given on the command line override the config file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "company_profiler",
    version,
    about = "Builds a structured company profile from a company's public web presence"
)]
pub struct Cli {
    /// Seed URL of the company website (http or https)
    pub url: String,

    /// Company name used for the review search (defaults to the domain label)
    #[arg(long)]
    pub company_name: Option<String>,

    /// Location added to a second review query per site
    #[arg(long)]
    pub location: Option<String>,

    /// JSON configuration file (camelCase keys, all optional)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Refetch script-rendered seed pages with a headless browser
    #[arg(long)]
    pub dynamic_fallback: bool,

    /// Proxy for review searches; repeat to build a rotation pool
    #[arg(long = "proxy", value_name = "URL")]
    pub proxies: Vec<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain or json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads the config file (if any) and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };
        if self.dynamic_fallback {
            config.dynamic_fallback = true;
        }
        if !self.proxies.is_empty() {
            config.proxy_pool = self.proxies.clone();
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
