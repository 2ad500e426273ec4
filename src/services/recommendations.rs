use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tokio::sync::RwLock;

use crate::{
    models::{
        Envelope, FetchStatus, PlotLength, RecommendationState, SearchRequest, TitleDetail,
        TitleKind, TitleSummary, YearRange,
    },
    services::providers::MovieGateway,
};

/// Most candidates ever offered at once
pub const MAX_CANDIDATES: usize = 4;
/// Width of the fallback year window when no release year is known
pub const DEFAULT_YEAR_SPAN: i32 = 10;

pub const NO_RECOMMENDATIONS_MESSAGE: &str = "No recommendations found.";
pub const RECOMMENDATIONS_FAILED_MESSAGE: &str = "Failed to fetch recommendations.";

/// Genre and year statistics gathered from watchlist details
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TasteProfile {
    genres: Vec<String>,
    years: Vec<i32>,
}

impl TasteProfile {
    pub fn from_details<'a>(details: impl IntoIterator<Item = &'a TitleDetail>) -> Self {
        let mut profile = Self::default();
        for detail in details {
            profile
                .genres
                .extend(detail.genre_tokens().map(str::to_string));
            if let Some(year) = detail.release_year() {
                profile.years.push(year);
            }
        }
        profile
    }

    /// Most frequent genre; on a tie the one seen first wins
    pub fn dominant_genre(&self) -> Option<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for genre in &self.genres {
            let count = counts.entry(genre.as_str()).or_insert(0);
            if *count == 0 {
                order.push(genre.as_str());
            }
            *count += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for genre in order {
            let count = counts[genre];
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((genre, count));
            }
        }
        best.map(|(genre, _)| genre)
    }

    /// [min, max] of known years, or the last decade when none are known
    pub fn year_range(&self, current_year: i32) -> YearRange {
        match (self.years.iter().min(), self.years.iter().max()) {
            (Some(&start), Some(&end)) => YearRange { start, end },
            _ => YearRange {
                start: current_year - DEFAULT_YEAR_SPAN,
                end: current_year,
            },
        }
    }
}

/// Search term derived from a genre seed: its first comma segment
fn seed_term(genre: &str) -> &str {
    genre.split(',').next().unwrap_or(genre).trim()
}

/// Suggests same-genre titles based on what is already on the watchlist
pub struct RecommendationEngine {
    gateway: Arc<dyn MovieGateway>,
    state: RwLock<RecommendationState>,
}

impl RecommendationEngine {
    pub fn new(gateway: Arc<dyn MovieGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(RecommendationState::default()),
        }
    }

    pub async fn snapshot(&self) -> RecommendationState {
        self.state.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.state.write().await = RecommendationState::default();
    }

    /// Recomputes candidates from scratch for the given watchlist
    pub async fn refresh(&self, watchlist: &[TitleSummary]) {
        if watchlist.is_empty() {
            self.clear().await;
            return;
        }

        {
            let mut state = self.state.write().await;
            state.status = FetchStatus::Loading;
            state.error_message = None;
        }

        let details = self.fetch_details(watchlist).await;
        let profile = TasteProfile::from_details(&details);

        let Some(genre) = profile.dominant_genre().map(str::to_string) else {
            tracing::debug!(
                watchlist = watchlist.len(),
                "No genre could be derived from the watchlist"
            );
            self.clear().await;
            return;
        };
        let year_range = profile.year_range(Utc::now().year());

        let request = SearchRequest::new(seed_term(&genre))
            .with_kind(TitleKind::Movie)
            .with_year(Some(year_range.midpoint().to_string()));

        let outcome = self.gateway.search(&request).await;

        let mut state = self.state.write().await;
        state.genre_seed = Some(genre);
        state.year_range = Some(year_range);

        match outcome {
            Ok(Envelope::Found(page)) => {
                state.candidates = page
                    .titles
                    .into_iter()
                    .filter(|title| !watchlist.iter().any(|saved| saved.id == title.id))
                    .take(MAX_CANDIDATES)
                    .collect();
                state.status = FetchStatus::Idle;
                state.error_message = None;
                tracing::info!(
                    genre = ?state.genre_seed,
                    year = year_range.midpoint(),
                    candidates = state.candidates.len(),
                    "Recommendations refreshed"
                );
            }
            Ok(Envelope::Empty { message }) => {
                tracing::info!(message = ?message, "No recommendations for watchlist profile");
                state.candidates.clear();
                state.status = FetchStatus::Error;
                state.error_message = Some(NO_RECOMMENDATIONS_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation search failed");
                state.candidates.clear();
                state.status = FetchStatus::Error;
                state.error_message = Some(RECOMMENDATIONS_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Fetches every entry's detail in parallel; failures are skipped
    async fn fetch_details(&self, watchlist: &[TitleSummary]) -> Vec<TitleDetail> {
        let tasks: Vec<_> = watchlist
            .iter()
            .map(|entry| {
                let gateway = Arc::clone(&self.gateway);
                let id = entry.id.clone();
                tokio::spawn(async move { gateway.title_detail(&id, PlotLength::Short).await })
            })
            .collect();

        let mut details = Vec::new();
        let mut failures = 0;

        for (entry, task) in watchlist.iter().zip(tasks) {
            match task.await {
                Ok(Ok(Envelope::Found(detail))) => details.push(detail),
                Ok(Ok(Envelope::Empty { message })) => {
                    tracing::debug!(title_id = %entry.id, message = ?message, "Detail not found");
                    failures += 1;
                }
                Ok(Err(e)) => {
                    tracing::warn!(title_id = %entry.id, error = %e, "Detail fetch failed");
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                success_count = details.len(),
                error_count = failures,
                "Partial watchlist detail fetch failure"
            );
        }

        details
    }
}
