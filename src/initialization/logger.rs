//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::{Config, LogFormat};
use crate::error_handling::InitializationError;
use crate::SENSITIVE_LOG_TARGET;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter overrides it for this crate.
///
/// Messages naming domains or URLs go to the `known_sites::sensitive` target,
/// which stays silent unless `log_sensitive` is set.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a global logger is already set.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=known_sites=debug,known_sites::sensitive=off my_host
/// ```
pub fn init_logger_with(
    level: LevelFilter,
    format: LogFormat,
    log_sensitive: bool,
) -> Result<(), InitializationError> {
    // Read from RUST_LOG environment variable first, then override with explicit level
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("known_sites", level);
    builder.filter_module(
        SENSITIVE_LOG_TARGET,
        if log_sensitive { level } else { LevelFilter::Off },
    );

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init() so a second initialization (e.g. in tests) errors instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Initializes the logger from the logging fields of `config`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a global logger is already set.
pub fn init_logger_from_config(config: &Config) -> Result<(), InitializationError> {
    init_logger_with(
        config.log_level.clone().into(),
        config.log_format.clone(),
        config.log_sensitive,
    )
}
