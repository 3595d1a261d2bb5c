//! Configuration types.
//!
//! This module defines the enums and structs used to configure the classifier,
//! the navigation gate and logging.

use std::time::Duration;

use thiserror::Error;

use crate::config::constants::{
    DEFAULT_INTERSTITIAL_URL, HISTORY_SEARCH_MAX_RESULTS, HISTORY_SEARCH_START_TIME,
    KNOWN_DOMAINS_CACHE_CAPACITY,
};

/// Logging level for the library.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Whether the host can tell private (incognito) windows apart from normal ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncognitoSupport {
    /// Incognito navigations use their own cache, cleared between sessions.
    Isolated,
    /// The host cannot isolate private windows; every navigation shares the
    /// persistent cache and the isolation guarantee does not hold.
    Unsupported,
}

/// Library configuration.
///
/// # Examples
///
/// ```
/// use known_sites::Config;
/// use std::time::Duration;
///
/// let config = Config {
///     cache_capacity: 500,
///     lookup_timeout: Some(Duration::from_secs(2)),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of each known-domain cache
    pub cache_capacity: usize,

    /// Maximum results requested from free-text history searches
    pub history_search_max_results: u32,

    /// Start of the searched history span (ms since epoch)
    pub history_search_start_time: i64,

    /// Optional bound on one browser-data lookup; expiry blocks the navigation
    pub lookup_timeout: Option<Duration>,

    /// Private-window capability of the host
    pub incognito_support: IncognitoSupport,

    /// Base URL of the confirmation page
    pub interstitial_url: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Log domain names and URLs at debug level.
    ///
    /// Off by default: browsing targets are private and debug output may be
    /// visible to anyone inspecting the host's console. Applied when the
    /// navigation gate is built, so it also holds under a host-installed logger.
    pub log_sensitive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: KNOWN_DOMAINS_CACHE_CAPACITY,
            history_search_max_results: HISTORY_SEARCH_MAX_RESULTS,
            history_search_start_time: HISTORY_SEARCH_START_TIME,
            lookup_timeout: None,
            incognito_support: IncognitoSupport::Isolated,
            interstitial_url: DEFAULT_INTERSTITIAL_URL.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            log_sensitive: false,
        }
    }
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is expected instead
    pub message: String,
}

impl Config {
    /// Checks that the configuration values are usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.cache_capacity == 0 {
            return Err(ConfigValidationError {
                field: "cache_capacity",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.history_search_max_results == 0 {
            return Err(ConfigValidationError {
                field: "history_search_max_results",
                message: "must be greater than 0 (history search would never match)".to_string(),
            });
        }
        if self.lookup_timeout == Some(Duration::ZERO) {
            return Err(ConfigValidationError {
                field: "lookup_timeout",
                message: "must be greater than 0 or unset".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.interstitial_url) {
            return Err(ConfigValidationError {
                field: "interstitial_url",
                message: format!(
                    "'{}' is not an absolute URL ({e})",
                    self.interstitial_url
                ),
            });
        }
        Ok(())
    }
}
