//! Host collaborator interfaces.
//!
//! The browser owns history, bookmarks, tabs and windows. The classifier and the
//! navigation gate reach them only through these traits, so any host (or test
//! fake) can be plugged in. Host failures are opaque and reported as
//! `anyhow::Error`.

use anyhow::Result;
use async_trait::async_trait;

/// A recorded visit of a URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visit {
    /// Host-assigned visit identifier
    pub visit_id: String,
    /// Visit time in milliseconds since the Unix epoch, if known
    pub visit_time: Option<f64>,
}

/// An entry returned by a free-text history search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryItem {
    /// Visited URL; the host may omit it
    pub url: Option<String>,
    /// Page title
    pub title: Option<String>,
}

/// Parameters of a free-text history search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Text matched against URLs and titles by the host
    pub text: String,
    /// Earliest visit time considered, in milliseconds since the Unix epoch
    pub start_time: i64,
    /// Upper bound on returned items
    pub max_results: u32,
}

/// Notification that history entries were deleted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitRemoval {
    /// The whole history was cleared
    pub all_history: bool,
    /// Removed URLs (empty when `all_history` is set)
    pub urls: Vec<String>,
}

/// A bookmark node; folders have no URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bookmark {
    /// Bookmarked URL, `None` for folders
    pub url: Option<String>,
    /// Bookmark or folder title
    pub title: Option<String>,
}

/// Bookmark search modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkQuery {
    /// Bookmarks whose URL equals the given URL exactly
    Url(String),
    /// Free-text search over bookmark URLs and titles
    Text(String),
}

/// Properties applied when navigating an existing tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabUpdate {
    /// URL to load
    pub url: String,
    /// Replace the tab's current history entry instead of adding one
    pub replace_history_entry: bool,
}

/// A browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    /// Host window id
    pub id: i64,
    /// Private window
    pub incognito: bool,
}

/// Read access to the browser history.
#[async_trait]
pub trait HistoryLookup: Send + Sync {
    /// Returns the visits recorded for exactly `url`.
    async fn get_visits(&self, url: &str) -> Result<Vec<Visit>>;

    /// Runs a free-text history search.
    async fn search(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>>;
}

/// Read access to the bookmarks.
#[async_trait]
pub trait BookmarkLookup: Send + Sync {
    async fn search(&self, query: &BookmarkQuery) -> Result<Vec<Bookmark>>;
}

/// Control over browser tabs.
#[async_trait]
pub trait TabController: Send + Sync {
    /// Navigates tab `tab_id`.
    async fn update(&self, tab_id: i64, update: TabUpdate) -> Result<()>;

    /// Closes tab `tab_id`.
    async fn remove(&self, tab_id: i64) -> Result<()>;
}

/// Enumeration of open browser windows.
#[async_trait]
pub trait WindowTracker: Send + Sync {
    async fn list_all(&self) -> Result<Vec<WindowInfo>>;
}
