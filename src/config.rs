use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Trivia question generator base URL
    #[serde(default = "default_trivia_api_url")]
    pub trivia_api_url: String,

    /// Directory holding durable local state (the watchlist)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Quiet period after the last keystroke before a search is sent
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Questions requested per trivia round
    #[serde(default = "default_trivia_question_count")]
    pub trivia_question_count: u32,

    /// Countdown per trivia question
    #[serde(default = "default_trivia_seconds_per_question")]
    pub trivia_seconds_per_question: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_trivia_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_trivia_question_count() -> u32 {
    5
}

fn default_trivia_seconds_per_question() -> u64 {
    20
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn trivia_time_per_question(&self) -> Duration {
        Duration::from_secs(self.trivia_seconds_per_question)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let vars = vec![("OMDB_API_KEY".to_string(), "k3y".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.omdb_api_key, "k3y");
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com/");
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.trivia_question_count, 5);
        assert_eq!(config.trivia_time_per_question(), Duration::from_secs(20));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let vars: Vec<(String, String)> = vec![("PORT".to_string(), "8080".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let vars = vec![
            ("OMDB_API_KEY".to_string(), "k".to_string()),
            ("SEARCH_DEBOUNCE_MS".to_string(), "250".to_string()),
            ("DATA_DIR".to_string(), "/tmp/portal".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.search_debounce_ms, 250);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/portal"));
    }
}
