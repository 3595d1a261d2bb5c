//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the library.

/// Capacity of each known-domain cache (persistent and incognito).
pub const KNOWN_DOMAINS_CACHE_CAPACITY: usize = 200;

/// Maximum number of items requested from a free-text history search.
///
/// Results beyond this bound are never inspected, so a genuine match ranked
/// lower by the host is missed and the site is treated as unknown.
pub const HISTORY_SEARCH_MAX_RESULTS: u32 = 100;

/// Start of the searched history span, in milliseconds since the Unix epoch.
/// Zero means "any point in the past".
pub const HISTORY_SEARCH_START_TIME: i64 = 0;

/// URL schemes (lowercase) that are checked by the navigation gate.
pub const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Default base URL of the confirmation page shown for unknown domains.
pub const DEFAULT_INTERSTITIAL_URL: &str = "ext://known-sites/pages/blocked-unknown.html";
