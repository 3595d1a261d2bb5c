//! Navigation gate.
//!
//! Entry point for every top-level navigation. Each navigation starts `pending`
//! and ends either `allowed` (proceeds unmodified) or `blocked` (canceled, and the
//! tab is sent to the confirmation page).
//!
//! Blocking takes two steps: the original request is canceled and the tab is then
//! navigated to the interstitial with a separate tab update. A redirect response
//! would not work because the browser records the original URL in history before
//! it can be suppressed.
//!
//! The tab update runs on a spawned Tokio task, so the cancel decision never
//! waits for it.

mod interstitial;

use std::collections::HashSet;
use std::sync::Arc;

use log::{error, info};
use tokio::runtime::Handle;

use crate::classifier::{KnownSiteClassifier, SiteClassification};
use crate::config::Config;
use crate::domain::{parse_domain, to_display_domain, DomainKey, SuffixList, UnsupportedProtocol};
use crate::error_handling::{DomainError, NavigationOutcome, NavigationStats};
use crate::host::{TabController, TabUpdate, VisitRemoval};

pub use interstitial::{interstitial_url, InterstitialMessage, InterstitialParams, MessageResponse};

/// Host answer for an intercepted navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockingResponse {
    /// Cancel the in-flight navigation
    pub cancel: bool,
}

/// Everything known about one navigation while it is being decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// The navigated URL
    pub url: String,
    /// Domain key used for cache and history comparison
    pub domain: DomainKey,
    /// Punycode-decoded domain, for display only
    pub display_domain: String,
    /// Navigation happens in a private window
    pub is_incognito: bool,
    /// Tab the navigation happens in
    pub tab_id: i64,
}

impl NavigationRequest {
    /// Derives the domain key and display domain of `url`.
    ///
    /// Unsupported protocols are not skipped here: they keep the raw URL as key
    /// so the navigation is still checked.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PunycodeDecode` if the domain key cannot be decoded;
    /// such a navigation must be blocked without classification.
    pub fn derive(
        suffixes: &dyn SuffixList,
        url: &str,
        tab_id: i64,
        is_incognito: bool,
    ) -> Result<Self, DomainError> {
        let domain = parse_domain(suffixes, url, UnsupportedProtocol::Fail)
            .unwrap_or_else(|| DomainKey::Fallback(url.to_string()));
        let display_domain = to_display_domain(domain.as_str())?;
        Ok(Self {
            url: url.to_string(),
            domain,
            display_domain,
            is_incognito,
            tab_id,
        })
    }

    fn interstitial_params(&self) -> InterstitialParams {
        InterstitialParams {
            url: self.url.clone(),
            domain: self.display_domain.clone(),
            raw_domain: self.domain.as_str().to_string(),
            is_incognito: self.is_incognito,
        }
    }
}

/// Navigation gate: classifies navigations and reacts to host events.
pub struct NavigationGate {
    classifier: Arc<KnownSiteClassifier>,
    tabs: Arc<dyn TabController>,
    suffixes: Arc<dyn SuffixList>,
    interstitial_base: String,
    stats: Arc<NavigationStats>,
}

impl NavigationGate {
    /// Creates a gate redirecting blocked tabs to `config.interstitial_url`.
    pub fn new(
        classifier: Arc<KnownSiteClassifier>,
        tabs: Arc<dyn TabController>,
        suffixes: Arc<dyn SuffixList>,
        config: &Config,
    ) -> Self {
        Self {
            classifier,
            tabs,
            suffixes,
            interstitial_base: config.interstitial_url.clone(),
            stats: Arc::new(NavigationStats::new()),
        }
    }

    /// The classifier deciding navigations.
    pub fn classifier(&self) -> &Arc<KnownSiteClassifier> {
        &self.classifier
    }

    /// Outcome counters of all decided navigations.
    pub fn stats(&self) -> &Arc<NavigationStats> {
        &self.stats
    }

    /// Decides a main-frame navigation.
    ///
    /// `incognito` is `None` when the host does not report it; such navigations
    /// are treated as normal ones.
    ///
    /// Returns as soon as the decision is known. For blocked navigations the
    /// redirect to the confirmation page is started in the background and its
    /// failure is only logged.
    pub async fn on_before_navigate(
        &self,
        url: &str,
        tab_id: i64,
        incognito: Option<bool>,
    ) -> BlockingResponse {
        let outcome = self.decide(url, tab_id, incognito.unwrap_or(false)).await;
        self.stats.increment(outcome);
        BlockingResponse {
            cancel: outcome.is_blocked(),
        }
    }

    async fn decide(&self, url: &str, tab_id: i64, is_incognito: bool) -> NavigationOutcome {
        debug_sensitive!(
            "Handling {}request for {url}",
            if is_incognito { "incognito " } else { "" }
        );

        let request = match NavigationRequest::derive(self.suffixes.as_ref(), url, tab_id, is_incognito) {
            Ok(request) => request,
            Err(e) => {
                // Handling of a malformed domain may be browser specific; cancel loading
                error!("{e}");
                return NavigationOutcome::BlockedDecodeFailure;
            }
        };

        let classification = self
            .classifier
            .classify(&request.url, &request.domain, request.is_incognito)
            .await;
        match classification {
            Ok(SiteClassification::KnownFromCache) => {
                debug_sensitive!("Allowing access to known domain {}", request.domain);
                NavigationOutcome::AllowedFromCache
            }
            Ok(SiteClassification::KnownFromBrowserData) => {
                debug_sensitive!("Allowing access to known domain {}", request.domain);
                NavigationOutcome::AllowedFromBrowserData
            }
            Ok(SiteClassification::Unknown) => {
                debug_sensitive!("Blocking unknown domain {}", request.domain);
                self.show_interstitial(&request);
                NavigationOutcome::BlockedUnknown
            }
            Err(e) => {
                error!("Failed classifying navigation, blocking it: {e}");
                self.show_interstitial(&request);
                NavigationOutcome::BlockedLookupFailure
            }
        }
    }

    /// Starts sending the tab to the confirmation page. Failure does not undo
    /// the block.
    fn show_interstitial(&self, request: &NavigationRequest) {
        let page = interstitial_url(&self.interstitial_base, &request.interstitial_params());
        let update = TabUpdate {
            url: page,
            replace_history_entry: false,
        };
        let tabs = Arc::clone(&self.tabs);
        let tab_id = request.tab_id;
        let redirect = async move {
            if let Err(e) = tabs.update(tab_id, update).await {
                error!("Failed opening blocking page in tab {tab_id}: {e:#}");
            }
        };
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(redirect);
            }
            Err(e) => error!("Cannot open blocking page in tab {tab_id} outside a Tokio runtime: {e}"),
        }
    }

    /// Updates the persistent cache after history entries were deleted.
    ///
    /// A domain is evicted even if other history for it remains; the next
    /// navigation re-runs the full lookup and caches it again if still justified.
    pub fn on_visit_removed(&self, removal: &VisitRemoval) {
        let caches = self.classifier.caches();
        if removal.all_history {
            info!("Clearing known domains cache after history was cleared");
            caches.persistent().clear();
            return;
        }

        let mut removed = HashSet::new();
        for url in &removal.urls {
            let Some(domain) = parse_domain(self.suffixes.as_ref(), url, UnsupportedProtocol::Ignore)
            else {
                continue;
            };
            let domain = domain.into_string();
            if removed.insert(domain.clone()) {
                debug_sensitive!("Removing domain {domain} from cache after history removal");
                caches.persistent().remove(&domain);
            }
        }
    }

    /// Handles the answer of a confirmation page shown in tab `tab_id`.
    pub async fn handle_interstitial_message(
        &self,
        tab_id: Option<i64>,
        message: InterstitialMessage,
    ) -> MessageResponse {
        let Some(tab_id) = tab_id else {
            error!("Failed to get tab ID of interstitial message sender");
            return MessageResponse::Error;
        };

        match message {
            InterstitialMessage::OpenUrl {
                url,
                domain,
                is_incognito,
            } => {
                // Cache first so the reopened URL is not blocked again
                self.classifier.remember_override(&domain, is_incognito);
                let update = TabUpdate {
                    url: url.clone(),
                    replace_history_entry: true,
                };
                if let Err(e) = self.tabs.update(tab_id, update).await {
                    error!("Failed opening URL {url}: {e:#}");
                }
            }
            InterstitialMessage::CloseTab => {
                if let Err(e) = self.tabs.remove(tab_id).await {
                    error!("Failed closing tab {tab_id}: {e:#}");
                }
            }
        }
        MessageResponse::Success
    }
}
