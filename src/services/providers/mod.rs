/// External data providers
///
/// The movie gateway and the trivia question generator are both remote HTTP
/// services. Each is reached through a trait so the controllers can be driven
/// by scripted implementations in tests.
use crate::{
    error::AppResult,
    models::{Envelope, PlotLength, SearchPage, SearchRequest, TitleDetail, TitleId, TriviaQuestion},
};

pub mod omdb;
pub mod question_generator;

pub use omdb::OmdbGateway;
pub use question_generator::HttpQuestionGenerator;

/// Trait for movie search/detail gateways
///
/// `Ok(Envelope::Empty)` is a well-formed "nothing here" answer; `Err` means
/// the call itself failed (network error, non-2xx, undecodable body).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieGateway: Send + Sync {
    /// Search titles by free text, one page at a time
    async fn search(&self, request: &SearchRequest) -> AppResult<Envelope<SearchPage>>;

    /// Fetch the full record for one title
    async fn title_detail(
        &self,
        id: &TitleId,
        plot: PlotLength,
    ) -> AppResult<Envelope<TitleDetail>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for trivia question sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, topic: &str, n_questions: u32) -> AppResult<Vec<TriviaQuestion>>;
}
