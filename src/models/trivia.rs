use serde::{Deserialize, Serialize};

/// A generated multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    /// Short clip or still image shown with the question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl TriviaQuestion {
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    /// Video when the URL path ends in mp4/webm/ogg, image otherwise
    pub fn media_kind(&self) -> Option<MediaKind> {
        let url = self.media_url.as_deref()?;
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        let is_video = [".mp4", ".webm", ".ogg"]
            .iter()
            .any(|ext| path.ends_with(ext));
        Some(if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        })
    }
}

/// A question as shown to the player; `answer` stays hidden until an option is picked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaPrompt {
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl TriviaPrompt {
    pub fn new(question: &TriviaQuestion, answered: bool) -> Self {
        Self {
            question: question.question.clone(),
            options: question.options.clone(),
            media_url: question.media_url.clone(),
            answer: answered.then(|| question.answer.clone()),
        }
    }
}

/// A selectable trivia category; `value` is what the generator is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriviaTopic {
    pub label: &'static str,
    pub value: &'static str,
}

pub const TOPICS: &[TriviaTopic] = &[
    TriviaTopic { label: "Action", value: "action films" },
    TriviaTopic { label: "Comedy", value: "comedy films" },
    TriviaTopic { label: "Sci-Fi", value: "science fiction films" },
    TriviaTopic { label: "Drama", value: "dramatic films" },
    TriviaTopic { label: "Oscar Winners", value: "oscar winning films" },
    TriviaTopic { label: "New Releases", value: "latest blockbuster releases" },
    TriviaTopic { label: "Blockbusters", value: "highest grossing blockbusters" },
    TriviaTopic { label: "80s Classics", value: "classic films from the 1980s" },
    TriviaTopic { label: "Animated", value: "animated films" },
    TriviaTopic { label: "Disney", value: "disney films" },
];

impl TriviaTopic {
    pub fn find(value: &str) -> Option<TriviaTopic> {
        TOPICS.iter().copied().find(|topic| topic.value == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriviaPhase {
    #[default]
    Intro,
    Loading,
    Playing,
    Finished,
}

/// Read-only view of a trivia round for API clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriviaSnapshot {
    pub phase: TriviaPhase,
    pub topic: Option<TriviaTopic>,
    pub question_index: usize,
    pub question_count: usize,
    pub question: Option<TriviaPrompt>,
    pub media_kind: Option<MediaKind>,
    pub selected_answer: Option<String>,
    pub last_points: Option<i32>,
    pub score: i32,
    pub seconds_left: Option<u64>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(media_url: Option<&str>) -> TriviaQuestion {
        TriviaQuestion {
            question: "Who directed Jaws?".to_string(),
            options: vec!["Spielberg".to_string(), "Lucas".to_string()],
            answer: "Spielberg".to_string(),
            media_url: media_url.map(str::to_string),
        }
    }

    #[test]
    fn test_question_deserializes_camel_case_media_url() {
        let json = r#"{"question":"Q","options":["A","B"],"answer":"A","mediaUrl":"https://x/clip.mp4"}"#;
        let parsed: TriviaQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.media_url.as_deref(), Some("https://x/clip.mp4"));

        let without: TriviaQuestion =
            serde_json::from_str(r#"{"question":"Q","options":[],"answer":"A"}"#).unwrap();
        assert_eq!(without.media_url, None);
    }

    #[test]
    fn test_media_kind_detection() {
        assert_eq!(question(None).media_kind(), None);
        assert_eq!(
            question(Some("https://cdn/clip.WEBM?t=3")).media_kind(),
            Some(MediaKind::Video)
        );
        assert_eq!(
            question(Some("https://cdn/still.jpg")).media_kind(),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn test_prompt_hides_answer_until_answered() {
        let q = question(Some("https://cdn/still.jpg"));

        let open = serde_json::to_value(TriviaPrompt::new(&q, false)).unwrap();
        assert!(open.get("answer").is_none());
        assert_eq!(open["mediaUrl"], "https://cdn/still.jpg");
        assert_eq!(open["options"], serde_json::json!(["Spielberg", "Lucas"]));

        let closed = serde_json::to_value(TriviaPrompt::new(&q, true)).unwrap();
        assert_eq!(closed["answer"], "Spielberg");
    }

    #[test]
    fn test_is_correct_is_exact_match() {
        let q = question(None);
        assert!(q.is_correct("Spielberg"));
        assert!(!q.is_correct("spielberg"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn test_topic_catalogue() {
        assert_eq!(TOPICS.len(), 10);
        assert_eq!(TriviaTopic::find("disney films").map(|t| t.label), Some("Disney"));
        assert_eq!(TriviaTopic::find("westerns"), None);
    }
}
