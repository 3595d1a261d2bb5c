//! Known-site classification.
//!
//! Combines the known-domain caches with the browser-data matcher into a single
//! decision per navigation, and owns the lifecycle of the incognito cache.
//!
//! Only positive results are cached. An unknown domain is looked up again on every
//! navigation, so a visit or bookmark added moments earlier is never masked by a
//! cached negative.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{info, warn};

use crate::browser_data::BrowserDataMatcher;
use crate::cache::KnownDomainCaches;
use crate::config::{Config, IncognitoSupport};
use crate::domain::{parse_origin, DomainKey};
use crate::error_handling::ClassificationError;
use crate::host::{WindowInfo, WindowTracker};

/// Why a site was classified the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteClassification {
    /// Domain found in a known-domain cache
    KnownFromCache,
    /// History or bookmarks matched
    KnownFromBrowserData,
    /// No evidence that the site was visited before
    Unknown,
}

impl SiteClassification {
    /// Returns `true` for both known variants.
    pub fn is_known(&self) -> bool {
        !matches!(self, SiteClassification::Unknown)
    }
}

/// Classification orchestrator.
///
/// Cheap to share behind an `Arc`; concurrent navigations only contend on the
/// cache locks, which are never held across a host query.
pub struct KnownSiteClassifier {
    caches: Arc<KnownDomainCaches>,
    matcher: BrowserDataMatcher,
    windows: Arc<dyn WindowTracker>,
    lookup_timeout: Option<Duration>,
    incognito_support: IncognitoSupport,
}

impl KnownSiteClassifier {
    /// Creates a classifier sharing `caches` with its owner.
    pub fn new(
        caches: Arc<KnownDomainCaches>,
        matcher: BrowserDataMatcher,
        windows: Arc<dyn WindowTracker>,
        config: &Config,
    ) -> Self {
        Self {
            caches,
            matcher,
            windows,
            lookup_timeout: config.lookup_timeout,
            incognito_support: config.incognito_support,
        }
    }

    /// The persistent and incognito caches.
    pub fn caches(&self) -> &Arc<KnownDomainCaches> {
        &self.caches
    }

    /// Returns whether the incognito flag is honored on this host.
    ///
    /// Without host support every navigation shares the persistent cache.
    pub fn effective_incognito(&self, is_incognito: bool) -> bool {
        is_incognito && self.incognito_support == IncognitoSupport::Isolated
    }

    /// Returns whether `url` belongs to a known site.
    ///
    /// # Errors
    ///
    /// Returns `ClassificationError` if a history or bookmark query fails or the
    /// lookup times out. Callers must treat this as "unknown".
    pub async fn is_known_site(
        &self,
        url: &str,
        domain: &DomainKey,
        is_incognito: bool,
    ) -> Result<bool, ClassificationError> {
        Ok(self.classify(url, domain, is_incognito).await?.is_known())
    }

    /// Classifies `url`, updating the caches on a positive browser-data match.
    ///
    /// Lookup order:
    /// 1. Persistent cache
    /// 2. Incognito cache (incognito navigations only)
    /// 3. History and bookmarks, with `origin` derived from `url`
    ///
    /// A match from step 3 is added to the incognito cache for incognito
    /// navigations and to the persistent cache otherwise. Fallback keys are
    /// never cached: they embed the whole URL and cannot recur.
    pub async fn classify(
        &self,
        url: &str,
        domain: &DomainKey,
        is_incognito: bool,
    ) -> Result<SiteClassification, ClassificationError> {
        let is_incognito = self.effective_incognito(is_incognito);
        let key = domain.as_str();

        if self.caches.persistent().contains(key) {
            debug_sensitive!("Found domain {key} in known domains cache");
            return Ok(SiteClassification::KnownFromCache);
        }
        if is_incognito && self.caches.incognito().contains(key) {
            debug_sensitive!("Found domain {key} in incognito known domains cache");
            return Ok(SiteClassification::KnownFromCache);
        }

        let origin = parse_origin(url);
        let started = Instant::now();
        let lookup = self
            .matcher
            .is_known_from_browser_data(url, origin.as_str(), key);
        let is_known = match self.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .map_err(|_| ClassificationError::LookupTimeout(limit))??,
            None => lookup.await?,
        };
        debug_sensitive!(
            "Lookup from browser data took {}ms",
            started.elapsed().as_millis()
        );

        if !is_known {
            return Ok(SiteClassification::Unknown);
        }

        if domain.is_fallback() {
            debug_sensitive!("Not caching fallback domain key {key}");
        } else {
            self.caches.for_writes(is_incognito).add(key);
        }
        Ok(SiteClassification::KnownFromBrowserData)
    }

    /// Marks `domain` as known after the user chose to open it anyway.
    pub fn remember_override(&self, domain: &str, is_incognito: bool) {
        let is_incognito = self.effective_incognito(is_incognito);
        debug_sensitive!(
            "Adding user-confirmed domain {domain} to {}known domains cache",
            if is_incognito { "incognito " } else { "" }
        );
        self.caches.for_writes(is_incognito).add(domain);
    }

    /// Reacts to a newly opened window.
    ///
    /// Opening the first incognito window clears the incognito cache, in case it
    /// was not cleared when the previous incognito session ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the open windows cannot be listed.
    pub async fn on_window_created(&self, window: WindowInfo) -> Result<()> {
        if !window.incognito {
            return Ok(());
        }
        if self.incognito_support == IncognitoSupport::Unsupported {
            warn!(
                "Incognito window opened but this browser cannot isolate incognito navigations; \
                 they share the known domains cache of normal windows"
            );
        }

        let has_other_incognito_windows = self
            .windows
            .list_all()
            .await?
            .iter()
            .any(|w| w.incognito && w.id != window.id);
        if !has_other_incognito_windows {
            info!("Detected first opened incognito window; clearing previous incognito cache");
            self.caches.incognito().clear();
        }
        Ok(())
    }

    /// Reacts to a closed window, clearing the incognito cache once no
    /// incognito window remains.
    ///
    /// # Errors
    ///
    /// Returns an error if the open windows cannot be listed.
    pub async fn on_window_removed(&self, window_id: i64) -> Result<()> {
        let has_incognito_window = self
            .windows
            .list_all()
            .await?
            .iter()
            .any(|w| w.incognito && w.id != window_id);
        if !has_incognito_window {
            info!("No incognito window is open anymore; clearing incognito cache");
            self.caches.incognito().clear();
        }
        Ok(())
    }
}
