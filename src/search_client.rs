use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::data_models::Post;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API error: HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RecentSearchResponse {
    // absent when nothing matched
    #[serde(default)]
    data: Vec<Post>,
}

/// Client for the Twitter v2 recent search endpoint (posts from the last seven days).
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn search_recent(
        &self,
        bearer_token: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<Post>, SearchError> {
        let url = format!("{}/2/tweets/search/recent", self.base_url);
        let max_results = max_results.to_string();

        let http_response = self
            .client
            .get(&url)
            .bearer_auth(bearer_token)
            .query(&[("query", query), ("max_results", max_results.as_str())])
            .send()
            .await?;

        let status = http_response.status();
        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let response_text = http_response.text().await?;
        let response: RecentSearchResponse = serde_json::from_str(&response_text)?;

        log::info!("search for {query:?} returned {} posts", response.data.len());
        Ok(response.data)
    }
}
