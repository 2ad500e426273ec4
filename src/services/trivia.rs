//! Trivia round state machine.
//!
//! intro → loading → playing → finished, with a countdown per question.
//! When the countdown runs out the question is answered with an empty
//! option, which scores as wrong.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{TriviaPhase, TriviaPrompt, TriviaQuestion, TriviaSnapshot, TriviaTopic},
    services::{providers::QuestionGenerator, timer::CancellableTimer},
};

pub const CORRECT_POINTS: i32 = 10;
pub const FAST_ANSWER_BONUS: i32 = 5;
pub const WRONG_PENALTY: i32 = -5;
pub const FAST_ANSWER_WINDOW: Duration = Duration::from_secs(5);

/// Points for one answer given `elapsed` time since the question appeared
pub fn score_answer(correct: bool, elapsed: Duration) -> i32 {
    match correct {
        true if elapsed < FAST_ANSWER_WINDOW => CORRECT_POINTS + FAST_ANSWER_BONUS,
        true => CORRECT_POINTS,
        false => WRONG_PENALTY,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TriviaSettings {
    pub question_count: u32,
    pub time_per_question: Duration,
}

impl Default for TriviaSettings {
    fn default() -> Self {
        Self {
            question_count: 5,
            time_per_question: Duration::from_secs(20),
        }
    }
}

#[derive(Debug)]
struct Round {
    phase: TriviaPhase,
    topic: Option<TriviaTopic>,
    questions: Vec<TriviaQuestion>,
    index: usize,
    score: i32,
    selected: Option<String>,
    last_points: Option<i32>,
    error: Option<String>,
    shown_at: Instant,
}

impl Default for Round {
    fn default() -> Self {
        Self {
            phase: TriviaPhase::Intro,
            topic: None,
            questions: Vec::new(),
            index: 0,
            score: 0,
            selected: None,
            last_points: None,
            error: None,
            shown_at: Instant::now(),
        }
    }
}

impl Round {
    fn current(&self) -> Option<&TriviaQuestion> {
        self.questions.get(self.index)
    }

    /// Records an answer for the current question and returns its points
    fn record_answer(&mut self, option: String) -> i32 {
        let correct = self
            .current()
            .map(|question| question.is_correct(&option))
            .unwrap_or(false);
        let points = score_answer(correct, self.shown_at.elapsed());

        self.score += points;
        self.selected = Some(option);
        self.last_points = Some(points);
        points
    }

    fn show_question(&mut self, index: usize) {
        self.index = index;
        self.selected = None;
        self.last_points = None;
        self.shown_at = Instant::now();
    }
}

struct GameInner {
    generator: Arc<dyn QuestionGenerator>,
    settings: TriviaSettings,
    round: RwLock<Round>,
    countdown: Mutex<CancellableTimer>,
}

#[derive(Clone)]
pub struct TriviaGame {
    inner: Arc<GameInner>,
}

impl TriviaGame {
    pub fn new(generator: Arc<dyn QuestionGenerator>, settings: TriviaSettings) -> Self {
        Self {
            inner: Arc::new(GameInner {
                generator,
                settings,
                round: RwLock::new(Round::default()),
                countdown: Mutex::new(CancellableTimer::new()),
            }),
        }
    }

    pub async fn snapshot(&self) -> TriviaSnapshot {
        let seconds_left = self
            .inner
            .countdown
            .lock()
            .await
            .remaining()
            .map(|left| left.as_secs_f64().ceil() as u64);
        let round = self.inner.round.read().await;
        let question = match round.phase {
            TriviaPhase::Playing => round.current(),
            _ => None,
        };

        TriviaSnapshot {
            phase: round.phase,
            topic: round.topic,
            question_index: round.index,
            question_count: round.questions.len(),
            media_kind: question.and_then(TriviaQuestion::media_kind),
            question: question.map(|q| TriviaPrompt::new(q, round.selected.is_some())),
            selected_answer: round.selected.clone(),
            last_points: round.last_points,
            score: round.score,
            seconds_left: match (round.phase, &round.selected) {
                (TriviaPhase::Playing, None) => seconds_left,
                _ => None,
            },
            error: round.error.clone(),
        }
    }

    /// Fetches questions for `topic_value` and starts a round.
    ///
    /// Generator failures send the game back to the intro screen with the
    /// failure message rather than returning an error.
    pub async fn start(&self, topic_value: &str) -> AppResult<TriviaSnapshot> {
        let topic = TriviaTopic::find(topic_value)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown trivia topic: {}", topic_value)))?;

        {
            let mut round = self.inner.round.write().await;
            if matches!(round.phase, TriviaPhase::Loading | TriviaPhase::Playing) {
                return Err(AppError::InvalidInput(
                    "A trivia round is already in progress".to_string(),
                ));
            }
            round.phase = TriviaPhase::Loading;
            round.topic = Some(topic);
            round.error = None;
        }

        let generated = self
            .inner
            .generator
            .generate(topic.value, self.inner.settings.question_count)
            .await;

        let started = {
            let mut round = self.inner.round.write().await;
            match generated {
                Ok(questions) if !questions.is_empty() => {
                    tracing::info!(topic = %topic.value, questions = questions.len(), "Trivia round started");
                    round.phase = TriviaPhase::Playing;
                    round.questions = questions;
                    round.score = 0;
                    round.show_question(0);
                    true
                }
                Ok(_) => {
                    tracing::warn!(topic = %topic.value, "Generator returned no questions");
                    round.phase = TriviaPhase::Intro;
                    round.error = Some("No questions were generated.".to_string());
                    false
                }
                Err(e) => {
                    tracing::error!(topic = %topic.value, error = %e, "Failed to start trivia round");
                    round.phase = TriviaPhase::Intro;
                    round.error = Some(e.user_message());
                    false
                }
            }
        };

        if started {
            self.arm_countdown(0).await;
        }
        Ok(self.snapshot().await)
    }

    /// Answers the current question; each question accepts one answer
    pub async fn answer(&self, option: impl Into<String>) -> AppResult<i32> {
        let points = {
            let mut round = self.inner.round.write().await;
            if round.phase != TriviaPhase::Playing {
                return Err(AppError::InvalidInput("No trivia round in progress".to_string()));
            }
            if round.selected.is_some() {
                return Err(AppError::InvalidInput(
                    "This question was already answered".to_string(),
                ));
            }
            round.record_answer(option.into())
        };

        self.inner.countdown.lock().await.cancel();
        Ok(points)
    }

    /// Moves to the next question, or finishes after the last one
    pub async fn next(&self) -> AppResult<TriviaSnapshot> {
        let next_index = {
            let mut round = self.inner.round.write().await;
            if round.phase != TriviaPhase::Playing || round.selected.is_none() {
                return Err(AppError::InvalidInput(
                    "Answer the current question first".to_string(),
                ));
            }

            if round.index + 1 < round.questions.len() {
                let next = round.index + 1;
                round.show_question(next);
                Some(next)
            } else {
                round.phase = TriviaPhase::Finished;
                tracing::info!(score = round.score, "Trivia round finished");
                None
            }
        };

        match next_index {
            Some(index) => self.arm_countdown(index).await,
            None => {
                self.inner.countdown.lock().await.cancel();
            }
        }
        Ok(self.snapshot().await)
    }

    /// Back to the intro screen ("play again")
    pub async fn reset(&self) -> TriviaSnapshot {
        self.inner.countdown.lock().await.cancel();
        {
            let mut round = self.inner.round.write().await;
            round.phase = TriviaPhase::Intro;
            round.error = None;
        }
        self.snapshot().await
    }

    pub async fn shutdown(&self) {
        self.inner.countdown.lock().await.cancel();
    }

    async fn arm_countdown(&self, index: usize) {
        let game = self.clone();
        self.inner
            .countdown
            .lock()
            .await
            .arm(self.inner.settings.time_per_question, async move {
                game.expire(index).await;
            });
    }

    /// Countdown expiry: answers with an empty option if still unanswered
    async fn expire(&self, index: usize) {
        let mut round = self.inner.round.write().await;
        if round.phase == TriviaPhase::Playing && round.index == index && round.selected.is_none() {
            let points = round.record_answer(String::new());
            tracing::debug!(question = index, points, "Trivia question timed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use crate::services::providers::MockQuestionGenerator;
    use tokio_test::{assert_err, assert_ok};

    fn questions(n: usize) -> Vec<TriviaQuestion> {
        (0..n)
            .map(|i| TriviaQuestion {
                question: format!("Question {}", i),
                options: vec!["right".to_string(), "wrong".to_string()],
                answer: "right".to_string(),
                media_url: None,
            })
            .collect()
    }

    fn game_with(n: usize) -> TriviaGame {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .withf(|topic, n| topic == "comedy films" && *n == 5)
            .returning(move |_, _| Ok(questions(n)));
        TriviaGame::new(Arc::new(generator), TriviaSettings::default())
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_score_answer() {
        assert_eq!(score_answer(true, Duration::from_secs(2)), 15);
        assert_eq!(score_answer(true, Duration::from_secs(5)), 10);
        assert_eq!(score_answer(true, Duration::from_secs(19)), 10);
        assert_eq!(score_answer(false, Duration::from_secs(1)), -5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_round_scoring() {
        let game = game_with(3);
        let snapshot = assert_ok!(game.start("comedy films").await);
        assert_eq!(snapshot.phase, TriviaPhase::Playing);
        assert_eq!(snapshot.question_count, 3);
        assert_eq!(snapshot.seconds_left, Some(20));

        // Fast and correct
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(assert_ok!(game.answer("right").await), 15);
        assert_ok!(game.next().await);

        // Slow and correct
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(assert_ok!(game.answer("right").await), 10);
        assert_ok!(game.next().await);

        // Wrong
        assert_eq!(assert_ok!(game.answer("wrong").await), -5);
        let finished = assert_ok!(game.next().await);

        assert_eq!(finished.phase, TriviaPhase::Finished);
        assert_eq!(finished.score, 20);
        assert_eq!(finished.question, None);
        assert_eq!(finished.media_kind, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reveals_answer_only_after_answering() {
        let game = game_with(1);
        let playing = assert_ok!(game.start("comedy films").await);

        let json = serde_json::to_string(&playing).unwrap();
        assert!(!json.contains("\"answer\""));
        assert_eq!(playing.question.as_ref().unwrap().answer, None);

        assert_ok!(game.answer("wrong").await);
        let answered = game.snapshot().await;
        assert_eq!(
            answered.question.unwrap().answer.as_deref(),
            Some("right")
        );
        assert_eq!(answered.selected_answer.as_deref(), Some("wrong"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_round_drops_media_kind() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().returning(|_, _| {
            Ok(vec![TriviaQuestion {
                question: "Which film is this?".to_string(),
                options: vec!["Alien".to_string(), "Heat".to_string()],
                answer: "Alien".to_string(),
                media_url: Some("https://cdn/clip.mp4".to_string()),
            }])
        });
        let game = TriviaGame::new(Arc::new(generator), TriviaSettings::default());

        let playing = assert_ok!(game.start("comedy films").await);
        assert_eq!(playing.media_kind, Some(MediaKind::Video));

        assert_ok!(game.answer("Alien").await);
        let finished = assert_ok!(game.next().await);
        assert_eq!(finished.phase, TriviaPhase::Finished);
        assert_eq!(finished.media_kind, None);

        let intro = game.reset().await;
        assert_eq!(intro.media_kind, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expiry_auto_submits_empty_answer() {
        let game = game_with(2);
        assert_ok!(game.start("comedy films").await);

        tokio::time::sleep(Duration::from_secs(21)).await;
        settle().await;

        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.selected_answer.as_deref(), Some(""));
        assert_eq!(snapshot.last_points, Some(WRONG_PENALTY));
        assert_eq!(snapshot.score, -5);
        assert_eq!(snapshot.seconds_left, None);

        // Late answers are rejected once the question is closed
        assert_err!(game.answer("right").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_cancels_countdown() {
        let game = game_with(1);
        assert_ok!(game.start("comedy films").await);
        assert_ok!(game.answer("right").await);

        tokio::time::sleep(Duration::from_secs(30)).await;
        settle().await;

        assert_eq!(game.snapshot().await.score, 15);
    }

    #[tokio::test]
    async fn test_next_requires_an_answer() {
        let game = game_with(2);
        assert_ok!(game.start("comedy films").await);
        assert_err!(game.next().await);
        game.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_topic_is_rejected() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().never();
        let game = TriviaGame::new(Arc::new(generator), TriviaSettings::default());

        let err = game.start("westerns").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(game.snapshot().await.phase, TriviaPhase::Intro);
    }

    #[tokio::test]
    async fn test_generator_failure_returns_to_intro_with_message() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(AppError::ExternalApi("500: model unavailable".to_string())));
        let game = TriviaGame::new(Arc::new(generator), TriviaSettings::default());

        let snapshot = assert_ok!(game.start("disney films").await);

        assert_eq!(snapshot.phase, TriviaPhase::Intro);
        assert_eq!(snapshot.error.as_deref(), Some("500: model unavailable"));
        assert_eq!(snapshot.topic.map(|t| t.label), Some("Disney"));
    }

    #[tokio::test]
    async fn test_empty_question_set_is_an_error_state() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().returning(|_, _| Ok(Vec::new()));
        let game = TriviaGame::new(Arc::new(generator), TriviaSettings::default());

        let snapshot = assert_ok!(game.start("animated films").await);
        assert_eq!(snapshot.phase, TriviaPhase::Intro);
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn test_cannot_start_while_playing_but_can_after_reset() {
        let game = game_with(1);
        assert_ok!(game.start("comedy films").await);
        assert_err!(game.start("comedy films").await);

        let snapshot = game.reset().await;
        assert_eq!(snapshot.phase, TriviaPhase::Intro);

        let restarted = assert_ok!(game.start("comedy films").await);
        assert_eq!(restarted.phase, TriviaPhase::Playing);
        assert_eq!(restarted.score, 0);
        game.shutdown().await;
    }
}
