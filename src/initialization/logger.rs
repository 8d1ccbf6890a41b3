//! Logger initialization.
//!
//! Plain output is one colored line per record, prefixed with a level emoji.
//! JSON output is one object per line with `ts`, `level`, `target` and `msg`.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

/// Dependencies that log far more than a profile run needs.
///
/// The CDP handler logs every unknown event and websocket frame, and the
/// HTML parser reports each recoverable markup error.
const NOISY_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("chromiumoxide", LevelFilter::Warn),
    ("tungstenite", LevelFilter::Warn),
    ("tokio_tungstenite", LevelFilter::Warn),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and `level` then overrides it, so
/// `RUST_LOG=company_profiler::search=debug` still narrows output per module
/// while `--log-level` decides the crate-wide floor.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, ceiling) in NOISY_MODULES {
        builder.filter_module(module, (*ceiling).min(level));
    }
    builder.filter_module("company_profiler", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let (emoji, level) = level_badge(record.level());
                writeln!(
                    buf,
                    "{} {} {} [{}] {}",
                    emoji,
                    chrono::Local::now().format("%H:%M:%S"),
                    record.target().cyan(),
                    level,
                    record.args()
                )
            });
        }
    }

    // try_init: tests may install a logger more than once per process
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// One JSON log line. The message is escaped through `serde_json`.
fn json_line(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

fn level_badge(level: Level) -> (&'static str, ColoredString) {
    let name = level.as_str();
    match level {
        Level::Error => ("❌", name.red()),
        Level::Warn => ("⚠️", name.yellow()),
        Level::Info => ("✔️", name.green()),
        Level::Debug => ("🔍", name.blue()),
        Level::Trace => ("🔬", name.purple()),
    }
}
