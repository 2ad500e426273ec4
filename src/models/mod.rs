mod session;
mod title;
mod trivia;

pub use session::{
    DetailState, FetchStatus, RecommendationState, SearchFilters, SearchSession, YearRange,
};
pub use title::{
    is_success, ApiSearchResponse, Envelope, PlotLength, SearchPage, SearchRequest, TitleDetail,
    TitleId, TitleKind, TitleSummary, NOT_AVAILABLE,
};
pub use trivia::{
    MediaKind, TriviaPhase, TriviaPrompt, TriviaQuestion, TriviaSnapshot, TriviaTopic, TOPICS,
};
