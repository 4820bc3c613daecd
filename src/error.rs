use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::action_log::LogForwardError;
use crate::language_detector::DetectionError;
use crate::result_writer::WriteError;
use crate::search_client::SearchError;

pub const ACTION_ID_HEADER: &str = "Direktiv-ActionID";
pub const ERROR_CODE_HEADER: HeaderName = HeaderName::from_static("direktiv-errorcode");
pub const ERROR_MESSAGE_HEADER: HeaderName = HeaderName::from_static("direktiv-errormessage");

pub const HEADER_ERROR_CODE: &str = "com.direktiv.header.error";
pub const LOGGING_ERROR_CODE: &str = "com.direktiv.logging.error";
pub const TWEETSLANG_ERROR_CODE: &str = "com.tweetslang.error";

/// Everything that can end a request early. Each variant maps to a Direktiv
/// error code and is answered with a 400.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Header '{}' must be set", ACTION_ID_HEADER)]
    MissingActionId,
    #[error("Header '{}' must contain only visible ASCII characters", ACTION_ID_HEADER)]
    InvalidActionId,
    #[error(
        "json field 'searchstring', 'bearertoken', 'projectid', 'location', 'gcpkey', \
         'maxsearchreturns' and 'outputfile' must be set (missing: {})",
        .0.join(", ")
    )]
    MissingFields(Vec<&'static str>),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error(transparent)]
    Output(#[from] WriteError),
    #[error(transparent)]
    Logging(#[from] LogForwardError),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingActionId | AppError::InvalidActionId => HEADER_ERROR_CODE,
            AppError::Logging(_) => LOGGING_ERROR_CODE,
            _ => TWEETSLANG_ERROR_CODE,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = self.to_string();
        log::error!("request failed ({code}): {message}");

        let mut headers = HeaderMap::new();
        headers.insert(ERROR_CODE_HEADER, HeaderValue::from_static(code));
        if let Ok(value) = HeaderValue::from_str(&header_safe(&message)) {
            headers.insert(ERROR_MESSAGE_HEADER, value);
        }

        (
            StatusCode::BAD_REQUEST,
            headers,
            Json(ErrorBody { error: message }),
        )
            .into_response()
    }
}

// Remote error bodies can carry newlines and non-ASCII text, neither of which
// is allowed in a header value.
fn header_safe(message: &str) -> String {
    message
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c
            } else {
                ' '
            }
        })
        .collect()
}
