//! known_sites library: first-contact protection for top-level navigations
//!
//! Every main-frame navigation is classified as going to a *known* site (visited
//! before or bookmarked) or an *unknown* one. Navigations to unknown sites are
//! canceled and the tab is sent to a confirmation page instead.
//!
//! The host browser is reached through the traits in [`host`]; this crate never
//! stores history or bookmarks itself.
//!
//! # Example
//!
//! ```no_run
//! use known_sites::initialization::{init_logger_from_config, init_navigation_gate, HostServices};
//! use known_sites::Config;
//!
//! # async fn example(host: HostServices) -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! init_logger_from_config(&config)?;
//!
//! let gate = init_navigation_gate(&config, host)?;
//! let response = gate.on_before_navigate("https://www.example.com/", 7, Some(false)).await;
//! if response.cancel {
//!     println!("example.com is new; confirmation page shown in tab 7");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Classification is async. The navigation gate must run inside a Tokio
//! runtime: redirects to the confirmation page are spawned as tasks.

#![warn(missing_docs)]

use std::sync::atomic::{AtomicBool, Ordering};

/// Log target for messages containing domains or URLs.
///
/// Disabled unless `Config::log_sensitive` is set.
pub const SENSITIVE_LOG_TARGET: &str = "known_sites::sensitive";

static SENSITIVE_LOGGING: AtomicBool = AtomicBool::new(false);

/// Enables or disables messages naming domains or URLs, whatever logger the
/// host installed.
///
/// Building a navigation gate sets this from `Config::log_sensitive`.
pub fn set_sensitive_logging(enabled: bool) {
    SENSITIVE_LOGGING.store(enabled, Ordering::Relaxed);
}

/// Returns whether messages naming domains or URLs are emitted.
pub fn sensitive_logging_enabled() -> bool {
    SENSITIVE_LOGGING.load(Ordering::Relaxed)
}

// Debug logging that may reveal browsing targets
macro_rules! debug_sensitive {
    ($($arg:tt)+) => {
        if $crate::sensitive_logging_enabled() {
            log::debug!(target: $crate::SENSITIVE_LOG_TARGET, $($arg)+)
        }
    };
}

pub mod browser_data;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod domain;
mod error_handling;
pub mod gate;
pub mod host;
pub mod initialization;

// Re-export public API
pub use browser_data::BrowserDataMatcher;
pub use cache::{KnownDomainCache, KnownDomainCaches};
pub use classifier::{KnownSiteClassifier, SiteClassification};
pub use config::{Config, ConfigValidationError, IncognitoSupport, LogFormat, LogLevel};
pub use domain::{
    parse_domain, parse_origin, to_display_domain, CanonicalKey, DomainKey, OriginKey,
    PublicSuffixList, SuffixList, UnsupportedProtocol,
};
pub use error_handling::{
    ClassificationError, DomainError, InitializationError, NavigationOutcome, NavigationStats,
};
pub use gate::{
    BlockingResponse, InterstitialMessage, InterstitialParams, MessageResponse, NavigationGate,
    NavigationRequest,
};
