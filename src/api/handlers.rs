use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use std::time::Instant;

use crate::action_log::ActionLogger;
use crate::data_models::{DetectionResult, Post};
use crate::error::{ACTION_ID_HEADER, AppError};
use crate::language_detector::DetectionError;
use crate::result_writer::ResultSet;

use super::AppState;
use super::models::TweetsLangRequest;

pub async fn tweets_lang_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let start = Instant::now();

    let action_id = headers
        .get(ACTION_ID_HEADER)
        .ok_or(AppError::MissingActionId)?
        .to_str()
        .map_err(|_| AppError::InvalidActionId)?;
    let logger = ActionLogger::new(state.http.clone(), &state.config.log_endpoint, action_id);

    logger.log("Decoding Input").await?;
    let request = TweetsLangRequest::from_body(&body)?;

    logger
        .log(&format!(
            "Searching recent tweets for '{}' (max {})",
            request.searchstring, request.maxsearchreturns
        ))
        .await?;
    let posts = state
        .search_client
        .search_recent(
            &request.bearertoken,
            &request.searchstring,
            request.maxsearchreturns,
        )
        .await?;

    let detected = detect_languages(&state, &request, posts).await?;

    let mut results = ResultSet::new();
    for (post, detection) in detected {
        logger
            .log(&format!(
                "Tweet {}: language {} (confidence {})",
                post.id, detection.language_code, detection.confidence
            ))
            .await?;
        results.record(post, detection);
    }

    results.write_to(&request.outputfile).await?;
    let body = results.to_json()?;

    logger
        .log("Completed twitter scrape and language detection")
        .await?;
    log::info!(
        "action {} finished with {} results in {}ms",
        logger.action_id(),
        results.len(),
        start.elapsed().as_millis()
    );

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Detects the language of every post, keeping search order. At most
/// `detect_concurrency` calls are in flight; the first failure aborts the rest.
async fn detect_languages(
    state: &AppState,
    request: &TweetsLangRequest,
    posts: Vec<Post>,
) -> Result<Vec<(Post, DetectionResult)>, DetectionError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let token = state.detector.authorize(&request.gcpkey).await?;
    let token = &token;
    let detector = &state.detector;

    stream::iter(posts)
        .map(|post| async move {
            let detection = detector
                .detect_with_token(token, &post.text, &request.location, &request.projectid)
                .await?;
            Ok::<_, DetectionError>((post, detection))
        })
        .buffered(state.config.detect_concurrency.max(1))
        .try_collect()
        .await
}
