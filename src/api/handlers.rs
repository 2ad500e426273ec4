use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::{
    DetailState, RecommendationState, SearchFilters, SearchSession, TitleId, TitleSummary,
    TriviaSnapshot, TriviaTopic, TOPICS,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct NextPageResponse {
    pub triggered: bool,
    pub session: SearchSession,
}

#[derive(Debug, Serialize)]
pub struct WatchlistToggleResponse {
    pub in_watchlist: bool,
    pub watchlist: Vec<TitleSummary>,
}

#[derive(Debug, Deserialize)]
pub struct StartTriviaBody {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    pub option: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub points: i32,
    pub round: TriviaSnapshot,
}

// Handlers

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SearchSession> {
    Json(state.search.snapshot().await)
}

/// Feeds one query value into the debounced search
pub async fn submit_search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> (StatusCode, Json<SearchSession>) {
    state.search.submit_query(body.query).await;
    (StatusCode::ACCEPTED, Json(state.search.snapshot().await))
}

/// End-of-results sentinel became visible
pub async fn next_page(State(state): State<AppState>) -> Json<NextPageResponse> {
    let triggered = state.search.trigger_next_page().await;
    Json(NextPageResponse {
        triggered,
        session: state.search.snapshot().await,
    })
}

pub async fn set_filters(
    State(state): State<AppState>,
    Json(filters): Json<SearchFilters>,
) -> Json<SearchSession> {
    state.search.set_filters(filters).await;
    Json(state.search.snapshot().await)
}

pub async fn get_watchlist(State(state): State<AppState>) -> Json<Vec<TitleSummary>> {
    Json(state.search.watchlist().await)
}

pub async fn toggle_watchlist(
    State(state): State<AppState>,
    Json(entry): Json<TitleSummary>,
) -> AppResult<Json<WatchlistToggleResponse>> {
    let in_watchlist = state.search.toggle_watchlist(entry).await?;
    Ok(Json(WatchlistToggleResponse {
        in_watchlist,
        watchlist: state.search.watchlist().await,
    }))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .search
        .remove_from_watchlist(&TitleId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_recommendations(State(state): State<AppState>) -> Json<RecommendationState> {
    Json(state.search.recommendations().await)
}

pub async fn get_details(State(state): State<AppState>) -> Json<DetailState> {
    Json(state.details.snapshot().await)
}

pub async fn open_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DetailState> {
    Json(state.details.open(&TitleId::new(id)).await)
}

pub async fn close_details(State(state): State<AppState>) -> Json<DetailState> {
    Json(state.details.close().await)
}

pub async fn get_trivia(State(state): State<AppState>) -> Json<TriviaSnapshot> {
    Json(state.trivia.snapshot().await)
}

pub async fn get_trivia_topics() -> Json<&'static [TriviaTopic]> {
    Json(TOPICS)
}

pub async fn start_trivia(
    State(state): State<AppState>,
    Json(body): Json<StartTriviaBody>,
) -> AppResult<Json<TriviaSnapshot>> {
    Ok(Json(state.trivia.start(&body.topic).await?))
}

pub async fn answer_trivia(
    State(state): State<AppState>,
    Json(body): Json<AnswerBody>,
) -> AppResult<Json<AnswerResponse>> {
    let points = state.trivia.answer(body.option).await?;
    Ok(Json(AnswerResponse {
        points,
        round: state.trivia.snapshot().await,
    }))
}

pub async fn next_trivia_question(
    State(state): State<AppState>,
) -> AppResult<Json<TriviaSnapshot>> {
    Ok(Json(state.trivia.next().await?))
}

pub async fn reset_trivia(State(state): State<AppState>) -> Json<TriviaSnapshot> {
    Json(state.trivia.reset().await)
}
