//! Library initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger
//! - Public suffix list
//! - Known-domain caches
//! - The classifier and navigation gate wired to the host collaborators

mod logger;

use std::sync::Arc;

use crate::browser_data::BrowserDataMatcher;
use crate::cache::KnownDomainCaches;
use crate::classifier::KnownSiteClassifier;
use crate::config::{Config, ConfigValidationError};
use crate::domain::{PublicSuffixList, SuffixList};
use crate::gate::NavigationGate;
use crate::host::{BookmarkLookup, HistoryLookup, TabController, WindowTracker};

// Re-export public API
pub use logger::{init_logger_from_config, init_logger_with};

/// Host collaborators the gate depends on.
#[derive(Clone)]
pub struct HostServices {
    /// History visits and search
    pub history: Arc<dyn HistoryLookup>,
    /// Bookmark search
    pub bookmarks: Arc<dyn BookmarkLookup>,
    /// Tab navigation and closing
    pub tabs: Arc<dyn TabController>,
    /// Window enumeration for the incognito cache lifecycle
    pub windows: Arc<dyn WindowTracker>,
}

/// Initializes the Public Suffix List used for domain keys.
pub fn init_suffix_list() -> Arc<dyn SuffixList> {
    Arc::new(PublicSuffixList)
}

/// Initializes the persistent and incognito known-domain caches.
///
/// Caches start empty and are rebuilt as navigations are classified.
pub fn init_caches(capacity: usize) -> Arc<KnownDomainCaches> {
    Arc::new(KnownDomainCaches::new(capacity))
}

/// Builds a navigation gate from a configuration and host collaborators.
///
/// # Errors
///
/// Returns `ConfigValidationError` if `config` is invalid.
pub fn init_navigation_gate(
    config: &Config,
    host: HostServices,
) -> Result<NavigationGate, ConfigValidationError> {
    init_navigation_gate_with(config, host, init_caches(config.cache_capacity), init_suffix_list())
}

/// Builds a navigation gate around existing caches and suffix list.
///
/// # Errors
///
/// Returns `ConfigValidationError` if `config` is invalid.
pub fn init_navigation_gate_with(
    config: &Config,
    host: HostServices,
    caches: Arc<KnownDomainCaches>,
    suffixes: Arc<dyn SuffixList>,
) -> Result<NavigationGate, ConfigValidationError> {
    config.validate()?;
    crate::set_sensitive_logging(config.log_sensitive);

    let matcher = BrowserDataMatcher::new(host.history, host.bookmarks, Arc::clone(&suffixes), config);
    let classifier = Arc::new(KnownSiteClassifier::new(caches, matcher, host.windows, config));
    Ok(NavigationGate::new(classifier, host.tabs, suffixes, config))
}
