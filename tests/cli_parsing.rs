//! Tests for command-line parsing and config-file overrides.

use std::io::Write;

use clap::Parser;
use company_profiler::{Cli, LogFormat, LogLevel};

#[test]
fn test_minimal_invocation_uses_defaults() {
    let cli = Cli::try_parse_from(["company_profiler", "https://acme.test"])
        .expect("URL alone should parse");
    assert_eq!(cli.url, "https://acme.test");
    assert_eq!(cli.company_name, None);
    assert_eq!(cli.log_level, LogLevel::Info);
    assert_eq!(cli.log_format, LogFormat::Plain);
    assert!(!cli.dynamic_fallback);
    assert!(cli.proxies.is_empty());

    let config = cli.to_config().expect("defaults are valid");
    assert!(!config.dynamic_fallback);
    assert!(config.proxy_pool.is_empty());
}

#[test]
fn test_all_flags_parse() {
    let cli = Cli::try_parse_from([
        "company_profiler",
        "https://acme.test",
        "--company-name",
        "Acme Corp",
        "--location",
        "Berlin",
        "--dynamic-fallback",
        "--proxy",
        "http://127.0.0.1:8080",
        "--proxy",
        "http://127.0.0.1:8081",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("all flags should parse");

    assert_eq!(cli.company_name.as_deref(), Some("Acme Corp"));
    assert_eq!(cli.location.as_deref(), Some("Berlin"));
    assert_eq!(cli.log_level, LogLevel::Debug);
    assert_eq!(cli.log_format, LogFormat::Json);

    let config = cli.to_config().expect("overrides are valid");
    assert!(config.dynamic_fallback);
    assert_eq!(
        config.proxy_pool,
        vec!["http://127.0.0.1:8080", "http://127.0.0.1:8081"]
    );
}

#[test]
fn test_missing_url_is_rejected() {
    assert!(Cli::try_parse_from(["company_profiler"]).is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    assert!(
        Cli::try_parse_from(["company_profiler", "https://acme.test", "--log-level", "loud"])
            .is_err()
    );
}

#[test]
fn test_config_file_with_cli_overrides() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"{{
            "maxRetries": 5,
            "requestDelaySeconds": 0.25,
            "proxyPool": ["http://10.0.0.1:3128"],
            "siteConfigs": [{{"key": "g2", "domain": "g2.com", "priority": 1}}]
        }}"#
    )
    .expect("Failed to write config");
    file.flush().expect("Failed to flush config");

    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "company_profiler",
        "https://acme.test",
        "--config",
        path.as_str(),
        "--proxy",
        "http://127.0.0.1:9000",
    ])
    .expect("flags should parse");

    let config = cli.to_config().expect("config should load");
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.request_delay_seconds, 0.25);
    assert_eq!(config.site_configs.len(), 1);
    assert_eq!(config.site_configs[0].query_suffix, "");
    // The command line wins over the file
    assert_eq!(config.proxy_pool, vec!["http://127.0.0.1:9000"]);
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, r#"{{"requestTimeoutSeconds": 0}}"#).expect("Failed to write config");
    file.flush().expect("Failed to flush config");

    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["company_profiler", "https://acme.test", "--config", path.as_str()])
        .expect("flags should parse");
    let err = cli.to_config().expect_err("zero timeout is invalid");
    assert!(format!("{err:#}").contains("requestTimeoutSeconds"));
}
