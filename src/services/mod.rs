pub mod details;
pub mod providers;
pub mod recommendations;
pub mod search_session;
pub mod timer;
pub mod trivia;

pub use details::DetailViewer;
pub use recommendations::RecommendationEngine;
pub use search_session::SearchController;
pub use timer::CancellableTimer;
pub use trivia::{TriviaGame, TriviaSettings};
