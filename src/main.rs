//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `company_profiler` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - JSON output of the profile, or of the error object on total failure
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use company_profiler::initialization::{init_client, init_logger_with};
use company_profiler::{Aggregator, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.into(), cli.log_format)
        .context("Failed to initialize logger")?;

    let config = cli.to_config()?;
    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let aggregator =
        Aggregator::new(client, Arc::new(config)).context("Failed to set up profiler")?;

    match aggregator
        .build_profile(
            &cli.url,
            cli.company_name.as_deref(),
            cli.location.as_deref(),
        )
        .await
    {
        Ok(profile) => {
            let json =
                serde_json::to_string_pretty(&profile).context("Failed to serialize profile")?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            log::error!("Profile for {} failed: {}", cli.url, e);
            let json = serde_json::to_string_pretty(&e).context("Failed to serialize error")?;
            println!("{json}");
            process::exit(1);
        }
    }
}
