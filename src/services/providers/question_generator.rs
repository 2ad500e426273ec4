/// Client for the trivia question generation service (`POST /generate`)
use crate::{
    error::{AppError, AppResult},
    models::TriviaQuestion,
    services::providers::QuestionGenerator,
};
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;

// Generation goes through a language model and can be slow
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
    n_questions: u32,
}

#[derive(Clone)]
pub struct HttpQuestionGenerator {
    http_client: HttpClient,
    api_url: String,
}

impl HttpQuestionGenerator {
    pub fn new(api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            api_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/generate", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, topic: &str, n_questions: u32) -> AppResult<Vec<TriviaQuestion>> {
        let response = self
            .http_client
            .post(self.endpoint())
            .json(&GenerateRequest { topic, n_questions })
            .send()
            .await?;

        // Failures come back as a plain-text description
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(topic = %topic, status = %status, body = %body, "Question generation failed");
            return Err(AppError::ExternalApi(format!("{}: {}", status.as_u16(), body)));
        }

        let questions: Vec<TriviaQuestion> = response.json().await?;

        tracing::info!(
            topic = %topic,
            requested = n_questions,
            received = questions.len(),
            "Trivia questions generated"
        );

        Ok(questions)
    }
}
