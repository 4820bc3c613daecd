use clap::Parser;
use std::sync::Arc;

use tweetslang::api::{self, AppState};
use tweetslang::config::CONFIG;

/// Direktiv action that detects the language of recent tweets.
#[derive(Parser, Debug)]
#[command(name = "tweetslang", version)]
struct Args {
    /// Address to listen on (overrides TWEETSLANG_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Concurrent language detection calls per request (overrides TWEETSLANG_DETECT_CONCURRENCY)
    #[arg(long)]
    detect_concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = CONFIG.clone();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(n) = args.detect_concurrency {
        config.detect_concurrency = n.max(1);
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("Starting twitter language server on {}", listener.local_addr()?);

    let state = Arc::new(AppState::new(config)?);
    api::serve(listener, state, api::shutdown_signal()).await?;

    log::info!("Server stopped");
    Ok(())
}
