use reqwest::Client;
use thiserror::Error;

/// Action ids that mean "running outside Direktiv": log locally, forward nothing.
const DEVELOPMENT_ACTION_IDS: [&str; 2] = ["development", "Development"];

#[derive(Debug, Error)]
pub enum LogForwardError {
    #[error("failed to log to direktiv: {0}")]
    Http(#[from] reqwest::Error),
    #[error("log request failed to direktiv: HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Per-request logger tied to the caller's action id.
pub struct ActionLogger {
    client: Client,
    endpoint: String,
    action_id: String,
}

impl ActionLogger {
    pub fn new(client: Client, endpoint: &str, action_id: impl Into<String>) -> ActionLogger {
        ActionLogger {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            action_id: action_id.into(),
        }
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn is_development(&self) -> bool {
        DEVELOPMENT_ACTION_IDS.contains(&self.action_id.as_str())
    }

    pub async fn log(&self, msg: &str) -> Result<(), LogForwardError> {
        if self.is_development() {
            log::info!("[{}] {}", self.action_id, msg);
            return Ok(());
        }

        let response = self
            .client
            .post(format!("{}/log", self.endpoint))
            .query(&[("aid", self.action_id.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "plain/text")
            .body(msg.to_string())
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(LogForwardError::Status(response.status()));
        }
        Ok(())
    }
}
