use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Outermost first: the request id must exist before the trace span is made
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Search session
        .route("/session", get(handlers::get_session))
        .route("/search", post(handlers::submit_search))
        .route("/search/next", post(handlers::next_page))
        .route("/filters", put(handlers::set_filters))
        // Watchlist
        .route("/watchlist", get(handlers::get_watchlist))
        .route("/watchlist/toggle", post(handlers::toggle_watchlist))
        .route("/watchlist/:id", delete(handlers::remove_from_watchlist))
        .route("/recommendations", get(handlers::get_recommendations))
        // Detail view
        .route(
            "/details",
            get(handlers::get_details).delete(handlers::close_details),
        )
        .route("/details/:id", post(handlers::open_details))
        // Trivia
        .route("/trivia", get(handlers::get_trivia))
        .route("/trivia/topics", get(handlers::get_trivia_topics))
        .route("/trivia/start", post(handlers::start_trivia))
        .route("/trivia/answer", post(handlers::answer_trivia))
        .route("/trivia/next", post(handlers::next_trivia_question))
        .route("/trivia/reset", post(handlers::reset_trivia))
}
