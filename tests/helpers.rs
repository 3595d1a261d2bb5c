// Shared test helpers: in-memory fakes of the host collaborators.
//
// Every fake records the queries it receives so tests can assert which lookups
// ran and in which order.

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use known_sites::host::{
    Bookmark, BookmarkLookup, BookmarkQuery, HistoryItem, HistoryLookup, HistoryQuery,
    TabController, TabUpdate, Visit, WindowInfo, WindowTracker,
};
use known_sites::initialization::{init_caches, init_navigation_gate_with, HostServices};
use known_sites::{BrowserDataMatcher, Config, NavigationGate, PublicSuffixList};

#[derive(Default)]
struct HistoryState {
    visited: Vec<String>,
    items: Vec<String>,
    fail: bool,
    delay: Option<Duration>,
    visit_queries: Vec<String>,
    search_queries: Vec<HistoryQuery>,
}

/// Fake history: exact visits plus free-text search by substring.
#[derive(Default)]
pub struct FakeHistory {
    state: Mutex<HistoryState>,
}

impl FakeHistory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records a visit of `url`; it is found by exact lookups and searches.
    pub fn add_visit(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        state.items.push(url.to_string());
    }

    /// Adds `url` to search results only.
    pub fn add_search_item(&self, url: &str) {
        self.state.lock().unwrap().items.push(url.to_string());
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.visited.clear();
        state.items.clear();
    }

    pub fn fail_lookups(&self) {
        self.state.lock().unwrap().fail = true;
    }

    pub fn delay_lookups(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn visit_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().visit_queries.clone()
    }

    pub fn search_texts(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.search_queries.iter().map(|q| q.text.clone()).collect()
    }

    pub fn search_queries(&self) -> Vec<HistoryQuery> {
        self.state.lock().unwrap().search_queries.clone()
    }

    /// Total number of history queries received.
    pub fn lookup_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.visit_queries.len() + state.search_queries.len()
    }

    pub fn reset_queries(&self) {
        let mut state = self.state.lock().unwrap();
        state.visit_queries.clear();
        state.search_queries.clear();
    }

    async fn wait(&self) {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HistoryLookup for FakeHistory {
    async fn get_visits(&self, url: &str) -> Result<Vec<Visit>> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.visit_queries.push(url.to_string());
        if state.fail {
            return Err(anyhow!("history backend unavailable"));
        }
        Ok(state
            .visited
            .iter()
            .filter(|visited| visited.as_str() == url)
            .enumerate()
            .map(|(i, _)| Visit {
                visit_id: i.to_string(),
                visit_time: None,
            })
            .collect())
    }

    async fn search(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.search_queries.push(query.clone());
        if state.fail {
            return Err(anyhow!("history backend unavailable"));
        }
        Ok(state
            .items
            .iter()
            .filter(|item| item.contains(&query.text))
            .take(query.max_results as usize)
            .map(|item| HistoryItem {
                url: Some(item.clone()),
                title: None,
            })
            .collect())
    }
}

#[derive(Default)]
struct BookmarkState {
    bookmarks: Vec<Bookmark>,
    queries: Vec<BookmarkQuery>,
}

/// Fake bookmarks: exact URL lookup plus free-text search by substring.
#[derive(Default)]
pub struct FakeBookmarks {
    state: Mutex<BookmarkState>,
}

impl FakeBookmarks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, url: &str) {
        self.state.lock().unwrap().bookmarks.push(Bookmark {
            url: Some(url.to_string()),
            title: None,
        });
    }

    pub fn add_folder(&self, title: &str) {
        self.state.lock().unwrap().bookmarks.push(Bookmark {
            url: None,
            title: Some(title.to_string()),
        });
    }

    pub fn queries(&self) -> Vec<BookmarkQuery> {
        self.state.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl BookmarkLookup for FakeBookmarks {
    async fn search(&self, query: &BookmarkQuery) -> Result<Vec<Bookmark>> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());
        let found = state
            .bookmarks
            .iter()
            .filter(|bookmark| match (query, bookmark.url.as_deref()) {
                (BookmarkQuery::Url(url), Some(bookmark_url)) => bookmark_url == url.as_str(),
                (BookmarkQuery::Text(text), Some(bookmark_url)) => bookmark_url.contains(text.as_str()),
                (BookmarkQuery::Text(text), None) => bookmark
                    .title
                    .as_deref()
                    .is_some_and(|title| title.contains(text.as_str())),
                (BookmarkQuery::Url(_), None) => false,
            })
            .cloned()
            .collect();
        Ok(found)
    }
}

#[derive(Default)]
struct TabState {
    updates: Vec<(i64, TabUpdate)>,
    removed: Vec<i64>,
    fail: bool,
    hang: bool,
}

/// Fake tab controller recording every command.
#[derive(Default)]
pub struct FakeTabs {
    state: Mutex<TabState>,
}

impl FakeTabs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_commands(&self) {
        self.state.lock().unwrap().fail = true;
    }

    /// Makes every later tab update record itself and then never complete.
    pub fn hang_updates(&self) {
        self.state.lock().unwrap().hang = true;
    }

    pub fn updates(&self) -> Vec<(i64, TabUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    /// Waits until `count` tab updates were received; redirects to the
    /// confirmation page run in the background.
    pub async fn wait_for_updates(&self, count: usize) -> Vec<(i64, TabUpdate)> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let updates = self.updates();
            if updates.len() >= count || tokio::time::Instant::now() >= deadline {
                return updates;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    pub fn removed(&self) -> Vec<i64> {
        self.state.lock().unwrap().removed.clone()
    }
}

#[async_trait]
impl TabController for FakeTabs {
    async fn update(&self, tab_id: i64, update: TabUpdate) -> Result<()> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.updates.push((tab_id, update));
            if state.fail {
                return Err(anyhow!("no tab with id {tab_id}"));
            }
            state.hang
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn remove(&self, tab_id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.removed.push(tab_id);
        if state.fail {
            return Err(anyhow!("no tab with id {tab_id}"));
        }
        Ok(())
    }
}

/// Fake window tracker returning a configurable window list.
#[derive(Default)]
pub struct FakeWindows {
    windows: Mutex<Vec<WindowInfo>>,
    fail: Mutex<bool>,
}

impl FakeWindows {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, windows: &[(i64, bool)]) {
        *self.windows.lock().unwrap() = windows
            .iter()
            .map(|&(id, incognito)| WindowInfo { id, incognito })
            .collect();
    }

    pub fn fail_listing(&self) {
        *self.fail.lock().unwrap() = true;
    }
}

#[async_trait]
impl WindowTracker for FakeWindows {
    async fn list_all(&self) -> Result<Vec<WindowInfo>> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("windows API unavailable"));
        }
        Ok(self.windows.lock().unwrap().clone())
    }
}

/// A navigation gate wired to fresh fakes.
pub struct TestHost {
    pub history: Arc<FakeHistory>,
    pub bookmarks: Arc<FakeBookmarks>,
    pub tabs: Arc<FakeTabs>,
    pub windows: Arc<FakeWindows>,
    pub gate: NavigationGate,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let history = FakeHistory::new();
        let bookmarks = FakeBookmarks::new();
        let tabs = FakeTabs::new();
        let windows = FakeWindows::new();
        let services = HostServices {
            history: history.clone(),
            bookmarks: bookmarks.clone(),
            tabs: tabs.clone(),
            windows: windows.clone(),
        };
        let gate = init_navigation_gate_with(
            &config,
            services,
            init_caches(config.cache_capacity),
            Arc::new(PublicSuffixList),
        )
        .expect("test config should be valid");
        Self {
            history,
            bookmarks,
            tabs,
            windows,
            gate,
        }
    }
}

/// A matcher over the given fakes with the default search bounds.
pub fn matcher(history: &Arc<FakeHistory>, bookmarks: &Arc<FakeBookmarks>) -> BrowserDataMatcher {
    matcher_with_config(history, bookmarks, &Config::default())
}

pub fn matcher_with_config(
    history: &Arc<FakeHistory>,
    bookmarks: &Arc<FakeBookmarks>,
    config: &Config,
) -> BrowserDataMatcher {
    BrowserDataMatcher::new(
        history.clone(),
        bookmarks.clone(),
        Arc::new(PublicSuffixList),
        config,
    )
}
