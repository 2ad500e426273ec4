//! Search session controller.
//!
//! Owns the live [`SearchSession`] and coordinates everything that feeds it:
//! debounced query input, sentinel-driven pagination, filter changes and the
//! watchlist. Watchlist mutations trigger an explicit recommendation
//! recompute while no query is active.
//!
//! At most one page fetch runs at a time. A fetch requested while another is
//! outstanding is dropped, not queued, and a response that completes after
//! the query has moved on is still applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use crate::{
    db::{LocalStorage, WatchlistStore},
    error::AppResult,
    models::{
        Envelope, FetchStatus, RecommendationState, SearchFilters, SearchRequest, SearchSession,
        TitleId, TitleSummary,
    },
    services::{providers::MovieGateway, recommendations::RecommendationEngine, timer::CancellableTimer},
};

/// Queries shorter than this never reach the gateway
pub const MIN_QUERY_CHARS: usize = 3;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch movies.";

/// Whether a query is long enough to be sent
pub fn is_searchable(query: &str) -> bool {
    !query.is_empty() && query.chars().count() >= MIN_QUERY_CHARS
}

/// Holds the in-flight flag for as long as it lives
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    gateway: Arc<dyn MovieGateway>,
    session: RwLock<SearchSession>,
    fetching: AtomicBool,
    debounce: Mutex<CancellableTimer>,
    debounce_delay: Duration,
    watchlist: Mutex<WatchlistStore>,
    recommendations: RecommendationEngine,
}

/// Cheap to clone; all clones drive the same session
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    pub fn new(
        gateway: Arc<dyn MovieGateway>,
        storage: Arc<dyn LocalStorage>,
        debounce_delay: Duration,
    ) -> Self {
        let watchlist = WatchlistStore::load(storage);
        let recommendations = RecommendationEngine::new(Arc::clone(&gateway));

        Self {
            inner: Arc::new(Inner {
                gateway,
                session: RwLock::new(SearchSession::default()),
                fetching: AtomicBool::new(false),
                debounce: Mutex::new(CancellableTimer::new()),
                debounce_delay,
                watchlist: Mutex::new(watchlist),
                recommendations,
            }),
        }
    }

    pub async fn snapshot(&self) -> SearchSession {
        self.inner.session.read().await.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.fetching.load(Ordering::Acquire)
    }

    /// Handles one keystroke's worth of query input.
    ///
    /// Results are cleared right away; the fetch waits for the debounce
    /// window so only the last value typed is sent.
    pub async fn submit_query(&self, raw: impl Into<String>) {
        let raw = raw.into();

        self.inner
            .session
            .write()
            .await
            .reset_for_query(raw.clone());

        let controller = self.clone();
        let pending = raw.clone();
        self.inner
            .debounce
            .lock()
            .await
            .arm(self.inner.debounce_delay, async move {
                controller.run_debounced(pending).await;
            });

        self.sync_recommendations().await;
    }

    async fn run_debounced(&self, query: String) {
        if query.trim().is_empty() {
            let mut session = self.inner.session.write().await;
            session.results.clear();
            session.status = FetchStatus::Idle;
            return;
        }

        self.fetch_page(&query, 1, false).await;
    }

    /// Fetches one page and replaces or extends the result list.
    ///
    /// Returns whether the gateway was actually called.
    pub async fn fetch_page(&self, query: &str, page: u32, append: bool) -> bool {
        if !is_searchable(query) {
            let mut session = self.inner.session.write().await;
            session.status = FetchStatus::Idle;
            session.error_message = None;
            return false;
        }

        let Some(_in_flight) = InFlight::acquire(&self.inner.fetching) else {
            tracing::debug!(query = %query, page, "Fetch already in flight, dropping request");
            return false;
        };

        let request = {
            let mut session = self.inner.session.write().await;
            session.status = FetchStatus::Loading;
            session.error_message = None;
            SearchRequest::new(query)
                .with_page(page)
                .with_year(session.filters.year.clone())
        };

        let outcome = self.inner.gateway.search(&request).await;

        let mut session = self.inner.session.write().await;
        match outcome {
            Ok(Envelope::Found(found)) => {
                let received = found.titles.len();
                if append {
                    session.results.extend(found.titles);
                } else {
                    session.results = found.titles;
                }
                session.status = FetchStatus::Idle;
                session.error_message = None;
                tracing::info!(
                    query = %query,
                    page,
                    append,
                    received,
                    total = session.results.len(),
                    "Search page applied"
                );
            }
            Ok(Envelope::Empty { message }) => {
                let message = message.unwrap_or_else(|| format!("No results for \"{}\"", query));
                tracing::info!(query = %query, page, message = %message, "Search returned no results");
                session.fail(message, append);
            }
            Err(e) => {
                tracing::warn!(query = %query, page, error = %e, "Search fetch failed");
                session.fail(FETCH_FAILED_MESSAGE.to_string(), append);
            }
        }
        true
    }

    /// Called when the end-of-results sentinel scrolls into view.
    ///
    /// Returns whether a next-page fetch reached the gateway. When nothing
    /// was fetched the page counter is put back.
    pub async fn trigger_next_page(&self) -> bool {
        let (query, next_page) = {
            let mut session = self.inner.session.write().await;
            if session.status != FetchStatus::Idle || self.is_fetching() {
                return false;
            }
            session.page += 1;
            (session.query.clone(), session.page)
        };

        if self.fetch_page(&query, next_page, true).await {
            return true;
        }

        let mut session = self.inner.session.write().await;
        if session.page == next_page {
            session.page -= 1;
        }
        false
    }

    /// Replaces the filters and starts over from page 1 without refetching
    pub async fn set_filters(&self, filters: SearchFilters) {
        self.inner
            .session
            .write()
            .await
            .reset_for_filters(filters);
    }

    pub async fn watchlist(&self) -> Vec<TitleSummary> {
        self.inner.watchlist.lock().await.entries().to_vec()
    }

    /// Adds or removes the title; returns whether it is saved afterwards
    pub async fn toggle_watchlist(&self, entry: TitleSummary) -> AppResult<bool> {
        let result = self.inner.watchlist.lock().await.toggle(entry);
        self.sync_recommendations().await;
        result
    }

    pub async fn remove_from_watchlist(&self, id: &TitleId) -> AppResult<bool> {
        let result = self.inner.watchlist.lock().await.remove(id);
        if matches!(result, Ok(false)) {
            return result;
        }
        self.sync_recommendations().await;
        result
    }

    pub async fn recommendations(&self) -> RecommendationState {
        self.inner.recommendations.snapshot().await
    }

    /// Recomputes recommendations when the query is empty, clears them otherwise
    pub async fn sync_recommendations(&self) {
        let query_empty = self.inner.session.read().await.query.is_empty();
        let watchlist = self.watchlist().await;

        if query_empty && !watchlist.is_empty() {
            self.inner.recommendations.refresh(&watchlist).await;
        } else {
            self.inner.recommendations.clear().await;
        }
    }

    /// Cancels any pending debounced search
    pub async fn shutdown(&self) {
        if self.inner.debounce.lock().await.cancel() {
            tracing::debug!("Pending debounced search cancelled");
        }
    }

    pub fn gateway_name(&self) -> &'static str {
        self.inner.gateway.name()
    }
}
