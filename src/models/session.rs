use serde::{Deserialize, Serialize};

use super::{TitleDetail, TitleSummary};

/// Lifecycle of a gateway-backed piece of state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Active search filters.
///
/// `genre` is accepted and stored but never forwarded to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Live search state for the current query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSession {
    pub query: String,
    pub page: u32,
    pub results: Vec<TitleSummary>,
    pub status: FetchStatus,
    pub error_message: Option<String>,
    pub filters: SearchFilters,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            status: FetchStatus::Idle,
            error_message: None,
            filters: SearchFilters::default(),
        }
    }
}

impl SearchSession {
    /// Starts over for a new query value: page 1, no results, no error
    pub fn reset_for_query(&mut self, query: String) {
        self.query = query;
        self.page = 1;
        self.results.clear();
        self.error_message = None;
        if self.status == FetchStatus::Error {
            self.status = FetchStatus::Idle;
        }
    }

    /// Replaces the filter set: page 1, no results
    pub fn reset_for_filters(&mut self, filters: SearchFilters) {
        self.filters = filters;
        self.page = 1;
        self.results.clear();
    }

    /// Records a failure message; results survive only when appending
    pub fn fail(&mut self, message: String, append: bool) {
        if !append {
            self.results.clear();
        }
        self.status = FetchStatus::Error;
        self.error_message = Some(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Floor of the range midpoint
    pub fn midpoint(&self) -> i32 {
        (self.start + self.end).div_euclid(2)
    }
}

/// Derived recommendation data; recomputed from scratch, never edited
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecommendationState {
    pub genre_seed: Option<String>,
    pub year_range: Option<YearRange>,
    pub candidates: Vec<TitleSummary>,
    pub status: FetchStatus,
    pub error_message: Option<String>,
}

/// State of the single-title detail view
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetailState {
    pub loading: bool,
    pub selected: Option<TitleDetail>,
    pub error: Option<String>,
}
