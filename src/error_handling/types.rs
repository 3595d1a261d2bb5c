//! Error type definitions.
//!
//! This module defines all error types and navigation outcome categories used
//! throughout the library.

use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors produced while turning a domain key into its display form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A label starting with `xn--` is not valid punycode.
    ///
    /// The key may be unsafe to display or route, so callers must not recover.
    #[error("Punycode conversion failed for domain {domain}")]
    PunycodeDecode {
        /// The raw domain key that failed to decode
        domain: String,
    },
}

/// Errors that leave a classification unsettled.
///
/// Callers must treat these as "unknown site".
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// A history or bookmark query failed.
    #[error("Browser data lookup failed: {0}")]
    Lookup(#[from] anyhow::Error),

    /// The browser data lookup exceeded the configured bound.
    #[error("Browser data lookup timed out after {0:?}")]
    LookupTimeout(Duration),
}

/// Final outcome of one navigation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum NavigationOutcome {
    /// Domain found in a known-domain cache
    AllowedFromCache,
    /// Domain matched history or bookmarks
    AllowedFromBrowserData,
    /// Domain is unknown; interstitial shown
    BlockedUnknown,
    /// Domain key could not be decoded for display
    BlockedDecodeFailure,
    /// Classification failed or timed out
    BlockedLookupFailure,
}

impl std::fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NavigationOutcome {
    /// Human-readable label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationOutcome::AllowedFromCache => "Allowed (known domains cache)",
            NavigationOutcome::AllowedFromBrowserData => "Allowed (history or bookmarks)",
            NavigationOutcome::BlockedUnknown => "Blocked (unknown domain)",
            NavigationOutcome::BlockedDecodeFailure => "Blocked (punycode decode failure)",
            NavigationOutcome::BlockedLookupFailure => "Blocked (lookup failure)",
        }
    }

    /// Returns true if the navigation was stopped.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::BlockedUnknown
                | NavigationOutcome::BlockedDecodeFailure
                | NavigationOutcome::BlockedLookupFailure
        )
    }
}
