use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::{FileStorage, LocalStorage},
    error::AppResult,
    services::{
        providers::{HttpQuestionGenerator, MovieGateway, OmdbGateway, QuestionGenerator},
        DetailViewer, SearchController, TriviaGame, TriviaSettings,
    },
};

/// Shared application state.
///
/// Built once at startup and handed to the router; `shutdown` cancels any
/// timers still pending.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchController,
    pub details: Arc<DetailViewer>,
    pub trivia: TriviaGame,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn MovieGateway>,
        storage: Arc<dyn LocalStorage>,
        generator: Arc<dyn QuestionGenerator>,
        search_debounce: Duration,
        trivia: TriviaSettings,
    ) -> Self {
        let search = SearchController::new(Arc::clone(&gateway), storage, search_debounce);
        tracing::info!(provider = search.gateway_name(), "Initializing application state");

        Self {
            search,
            details: Arc::new(DetailViewer::new(gateway)),
            trivia: TriviaGame::new(generator, trivia),
        }
    }

    /// Wires the real OMDb gateway, file storage and trivia client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let gateway = OmdbGateway::new(config.omdb_api_key.clone(), config.omdb_api_url.clone())?;
        let storage = FileStorage::open(&config.data_dir)?;
        let generator = HttpQuestionGenerator::new(config.trivia_api_url.clone())?;

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(storage),
            Arc::new(generator),
            config.search_debounce(),
            TriviaSettings {
                question_count: config.trivia_question_count,
                time_per_question: config.trivia_time_per_question(),
            },
        ))
    }

    pub async fn shutdown(&self) {
        self.search.shutdown().await;
        self.trivia.shutdown().await;
        tracing::info!("Application state shut down");
    }
}
