use axum::{Router, routing::post};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::language_detector::LanguageDetector;
use crate::search_client::SearchClient;

pub mod handlers;
pub mod models;

/// Shared across requests; holds no per-request data.
pub struct AppState {
    pub config: Config,
    pub http: Client,
    pub search_client: SearchClient,
    pub detector: LanguageDetector,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<AppState> {
        let http = Client::builder()
            .user_agent(concat!("tweetslang/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AppState {
            search_client: SearchClient::new(http.clone(), config.twitter_api_url.as_str()),
            detector: LanguageDetector::new(http.clone(), config.translate_api_url.as_str()),
            http,
            config,
        })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::tweets_lang_handler))
        .route("/*path", post(handlers::tweets_lang_handler))
        .with_state(state)
        // requests are handled one at a time, to completion
        .layer(GlobalConcurrencyLimitLayer::new(1))
        .layer(TraceLayer::new_for_http())
}

/// Serves on `listener` until `shutdown` resolves. The listener is dropped
/// (and the port released) before this returns.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("Shutting down Server");
}
