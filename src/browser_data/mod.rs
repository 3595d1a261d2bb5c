//! Browser-data matching.
//!
//! Decides whether history or bookmarks prove that a site was seen before. The
//! lookup cascades from cheap exact queries to free-text searches and stops at
//! the first match:
//!
//! 1. Visits recorded for the exact URL or the exact origin
//! 2. History search for the origin text
//! 3. History search for the domain key text
//! 4. Bookmarks for the exact URL or origin, then bookmark search for the origin
//!    and domain key text
//!
//! Free-text results are only trusted when an item's URL equals the navigation
//! URL or its domain key equals the navigation's domain key. A textual hit alone
//! never counts. Missing an old visit is acceptable; a false positive is not.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::domain::{parse_domain, SuffixList, UnsupportedProtocol};
use crate::host::{BookmarkLookup, BookmarkQuery, HistoryItem, HistoryLookup, HistoryQuery};

/// Read-only matcher over the host's history and bookmarks.
///
/// Never touches the known-domain caches; the classifier decides what to cache.
pub struct BrowserDataMatcher {
    history: Arc<dyn HistoryLookup>,
    bookmarks: Arc<dyn BookmarkLookup>,
    suffixes: Arc<dyn SuffixList>,
    search_start_time: i64,
    search_max_results: u32,
}

impl BrowserDataMatcher {
    /// Creates a matcher over the host's history and bookmarks.
    pub fn new(
        history: Arc<dyn HistoryLookup>,
        bookmarks: Arc<dyn BookmarkLookup>,
        suffixes: Arc<dyn SuffixList>,
        config: &Config,
    ) -> Self {
        Self {
            history,
            bookmarks,
            suffixes,
            search_start_time: config.history_search_start_time,
            search_max_results: config.history_search_max_results,
        }
    }

    /// Checks history and bookmarks for evidence that the site is known.
    ///
    /// # Arguments
    ///
    /// * `url` - The navigation URL
    /// * `origin` - Origin key of `url`
    /// * `domain` - Domain key of `url`
    ///
    /// # Errors
    ///
    /// Propagates the first failing host query; the cascade is not continued.
    pub async fn is_known_from_browser_data(
        &self,
        url: &str,
        origin: &str,
        domain: &str,
    ) -> Result<bool> {
        if self.has_visits(url).await? || self.has_visits(origin).await? {
            debug_sensitive!("Found visits in history for domain {domain}");
            return Ok(true);
        }

        debug_sensitive!("Did not find visit for domain {domain}; trying history search");
        if self.history_search_matches(origin, url, domain).await? {
            debug_sensitive!("Found match in history search results for domain {domain}");
            return Ok(true);
        }

        // Covers history entries under another scheme or port
        if self.history_search_matches(domain, url, domain).await? {
            debug_sensitive!("Found match in history domain search results for domain {domain}");
            return Ok(true);
        }

        debug_sensitive!("Did not find history entry for domain {domain}; trying bookmark search");
        if self.is_bookmarked_site(url, origin, domain).await? {
            debug_sensitive!("Found matching bookmark for domain {domain}");
            return Ok(true);
        }

        Ok(false)
    }

    async fn has_visits(&self, url: &str) -> Result<bool> {
        Ok(!self.history.get_visits(url).await?.is_empty())
    }

    async fn history_search_matches(&self, text: &str, url: &str, domain: &str) -> Result<bool> {
        let query = HistoryQuery {
            text: text.to_string(),
            start_time: self.search_start_time,
            max_results: self.search_max_results,
        };
        let items = self.history.search(&query).await?;
        Ok(items
            .iter()
            .any(|item| self.matches_history_item(item, url, domain)))
    }

    fn matches_history_item(&self, item: &HistoryItem, url: &str, domain: &str) -> bool {
        match item.url.as_deref() {
            Some(item_url) if item_url == url => true,
            Some(item_url) => self.has_domain(item_url, domain),
            None => false,
        }
    }

    fn has_domain(&self, url: &str, domain: &str) -> bool {
        parse_domain(self.suffixes.as_ref(), url, UnsupportedProtocol::Ignore)
            .is_some_and(|key| key.as_str() == domain)
    }

    async fn is_bookmarked_site(&self, url: &str, origin: &str, domain: &str) -> Result<bool> {
        Ok(self.has_exact_bookmark(url).await?
            || self.has_exact_bookmark(origin).await?
            || self.has_text_bookmark_match(origin, domain).await?
            || self.has_text_bookmark_match(domain, domain).await?)
    }

    async fn has_exact_bookmark(&self, url: &str) -> Result<bool> {
        let bookmarks = self
            .bookmarks
            .search(&BookmarkQuery::Url(url.to_string()))
            .await?;
        Ok(!bookmarks.is_empty())
    }

    async fn has_text_bookmark_match(&self, text: &str, domain: &str) -> Result<bool> {
        let bookmarks = self
            .bookmarks
            .search(&BookmarkQuery::Text(text.to_string()))
            .await?;
        Ok(bookmarks.iter().any(|bookmark| {
            bookmark
                .url
                .as_deref()
                .is_some_and(|bookmark_url| self.has_domain(bookmark_url, domain))
        }))
    }
}
