/// OMDb API gateway
///
/// Every call is a GET against a single endpoint; the query string selects the
/// operation:
/// 1. Search: `s=<query>&page=<n>&y=<year>&type=<kind>` → paginated summaries
/// 2. Detail: `i=<imdb id>&plot=short|full` → one full record
///
/// Both wrap their payload in a `Response: "True" | "False"` envelope, and a
/// "False" envelope may carry an `Error` message.
use crate::{
    error::{AppError, AppResult},
    models::{
        is_success, ApiSearchResponse, Envelope, PlotLength, SearchPage, SearchRequest,
        TitleDetail, TitleId,
    },
    services::providers::MovieGateway,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct OmdbGateway {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbGateway {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn search_params(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.api_key.clone()),
            ("s", request.query.clone()),
        ];
        if let Some(page) = request.page {
            params.push(("page", page.to_string()));
        }
        if let Some(year) = &request.year {
            params.push(("y", year.clone()));
        }
        if let Some(kind) = &request.kind {
            params.push(("type", kind.as_param().to_string()));
        }
        params
    }

    fn detail_params(&self, id: &TitleId, plot: PlotLength) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("i", id.to_string()),
            ("plot", plot.as_param().to_string()),
        ]
    }

    /// Sends the request and returns the body, failing on non-2xx statuses
    async fn get(&self, params: &[(&'static str, String)]) -> AppResult<String> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl MovieGateway for OmdbGateway {
    async fn search(&self, request: &SearchRequest) -> AppResult<Envelope<SearchPage>> {
        let body = self.get(&self.search_params(request)).await?;

        let raw: ApiSearchResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, response = %body, "Failed to deserialize OMDb search");
            AppError::ExternalApi(format!("Failed to parse OMDb response: {}", e))
        })?;

        let envelope = Envelope::from(raw);

        match &envelope {
            Envelope::Found(page) => tracing::info!(
                query = %request.query,
                page = ?request.page,
                results = page.titles.len(),
                provider = "omdb",
                "Title search completed"
            ),
            Envelope::Empty { message } => tracing::info!(
                query = %request.query,
                page = ?request.page,
                message = ?message,
                provider = "omdb",
                "Title search returned no results"
            ),
        }

        Ok(envelope)
    }

    async fn title_detail(
        &self,
        id: &TitleId,
        plot: PlotLength,
    ) -> AppResult<Envelope<TitleDetail>> {
        let body = self.get(&self.detail_params(id, plot)).await?;
        tracing::debug!(title_id = %id, response = %body, "Raw OMDb detail response");

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let success = value["Response"].as_str().map(is_success).unwrap_or(false);

        if !success {
            let message = value["Error"].as_str().map(str::to_string);
            tracing::info!(title_id = %id, message = ?message, provider = "omdb", "Title not found");
            return Ok(Envelope::Empty { message });
        }

        let detail: TitleDetail = serde_json::from_value(value).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse OMDb detail for {}: {}", id, e))
        })?;

        tracing::info!(title_id = %id, provider = "omdb", "Title detail fetched");

        Ok(Envelope::Found(detail))
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
