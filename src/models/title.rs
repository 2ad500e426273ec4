use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Sentinel the gateway uses for absent posters and ratings
pub const NOT_AVAILABLE: &str = "N/A";

/// Stable external identifier for a title (e.g. "tt1375666")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TitleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Series,
    Episode,
    #[serde(other)]
    Other,
}

impl TitleKind {
    /// Value of the gateway's `type` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Series => "series",
            TitleKind::Episode => "episode",
            TitleKind::Other => "other",
        }
    }
}

/// A search hit as returned by the gateway.
///
/// Field names follow the gateway's wire format so the same shape is used for
/// decoding responses, persisting the watchlist and answering API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    #[serde(rename = "imdbID")]
    pub id: TitleId,
    #[serde(rename = "Title")]
    pub title: String,
    /// May be a range such as "2019–2021"
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type")]
    pub kind: TitleKind,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
}

/// Full record for a single title, fetched lazily by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetail {
    #[serde(flatten)]
    pub summary: TitleSummary,
    /// Comma-separated free text, e.g. "Action, Adventure"
    #[serde(rename = "Genre", default)]
    pub genres: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Actors", default)]
    pub cast: String,
    #[serde(rename = "imdbRating", default)]
    pub rating: String,
    #[serde(rename = "Awards", default)]
    pub awards: Option<String>,
}

impl TitleDetail {
    pub fn id(&self) -> &TitleId {
        &self.summary.id
    }

    /// Genre names split on commas and trimmed
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty() && *genre != NOT_AVAILABLE)
    }

    /// First year in the year string ("2019–2021" gives 2019)
    pub fn release_year(&self) -> Option<i32> {
        let digits: String = self
            .summary
            .year
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

/// Decoded form of the gateway's `Response: "True" | "False"` wrapper
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// `Response: "True"` with a payload
    Found(T),
    /// `Response: "False"`, optionally with the gateway's explanation
    Empty { message: Option<String> },
}

impl<T> Envelope<T> {
    pub fn empty(message: impl Into<String>) -> Self {
        Envelope::Empty {
            message: Some(message.into()),
        }
    }
}

/// One page of search hits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub titles: Vec<TitleSummary>,
    pub total_results: Option<u32>,
}

/// Parameters of a single gateway search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub page: Option<u32>,
    pub year: Option<String>,
    pub kind: Option<TitleKind>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: None,
            year: None,
            kind: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Adds a year constraint; blank values are ignored
    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year.filter(|y| !y.trim().is_empty());
        self
    }

    pub fn with_kind(mut self, kind: TitleKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Which plot variant a detail lookup should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotLength {
    Short,
    Full,
}

impl PlotLength {
    pub fn as_param(&self) -> &'static str {
        match self {
            PlotLength::Short => "short",
            PlotLength::Full => "full",
        }
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw search response from the OMDb API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<TitleSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// Whether an OMDb `Response` field signals success
pub fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

impl From<ApiSearchResponse> for Envelope<SearchPage> {
    fn from(raw: ApiSearchResponse) -> Self {
        if !is_success(&raw.response) {
            return Envelope::Empty { message: raw.error };
        }

        Envelope::Found(SearchPage {
            titles: raw.search,
            total_results: raw.total_results.and_then(|n| n.parse().ok()),
        })
    }
}
