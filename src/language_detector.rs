use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::{self, AccessToken, CredentialsError, ServiceAccountKey};
use crate::data_models::DetectionResult;

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("language detection request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation API error: HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("translation API returned no languages for the text")]
    NoLanguages,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectLanguageRequest<'a> {
    content: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct DetectLanguageResponse {
    #[serde(default)]
    languages: Vec<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectedLanguage {
    language_code: String,
    #[serde(default)]
    confidence: f64,
}

/// Client for the Cloud Translation v3 `detectLanguage` method.
#[derive(Clone)]
pub struct LanguageDetector {
    client: Client,
    base_url: String,
}

impl LanguageDetector {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds transient credentials from `key` and detects the language of `text`.
    pub async fn detect(
        &self,
        text: &str,
        location: &str,
        project_id: &str,
        key: &ServiceAccountKey,
    ) -> Result<DetectionResult, DetectionError> {
        let token = self.authorize(key).await?;
        self.detect_with_token(&token, text, location, project_id)
            .await
    }

    pub async fn authorize(&self, key: &ServiceAccountKey) -> Result<AccessToken, DetectionError> {
        Ok(credentials::fetch_access_token(&self.client, key).await?)
    }

    pub async fn detect_with_token(
        &self,
        token: &AccessToken,
        text: &str,
        location: &str,
        project_id: &str,
    ) -> Result<DetectionResult, DetectionError> {
        let url = format!(
            "{}/v3/projects/{}/locations/{}:detectLanguage",
            self.base_url, project_id, location
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token.access_token)
            .json(&DetectLanguageRequest {
                content: text,
                mime_type: "text/plain",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectionError::Status { status, body });
        }

        let response: DetectLanguageResponse = response.json().await?;
        top_language(response)
    }
}

// The API sorts guesses by confidence, most probable first.
fn top_language(response: DetectLanguageResponse) -> Result<DetectionResult, DetectionError> {
    let best = response
        .languages
        .into_iter()
        .next()
        .ok_or(DetectionError::NoLanguages)?;

    Ok(DetectionResult {
        language_code: best.language_code,
        confidence: best.confidence,
    })
}
