use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_ENDPOINT: &str = "http://localhost:8889";
pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translation.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the action server listens on.
    pub bind_addr: String,
    /// Base URL of the Direktiv sidecar that receives forwarded log lines.
    pub log_endpoint: String,
    pub twitter_api_url: String,
    pub translate_api_url: String,
    /// Number of in-flight detection calls per request. 1 keeps them sequential.
    pub detect_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_endpoint: DEFAULT_LOG_ENDPOINT.to_string(),
            twitter_api_url: DEFAULT_TWITTER_API_URL.to_string(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            detect_concurrency: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            bind_addr: get_env_or_default("TWEETSLANG_BIND_ADDR", DEFAULT_BIND_ADDR),
            log_endpoint: get_env_or_default("DIREKTIV_LOG_ENDPOINT", DEFAULT_LOG_ENDPOINT),
            twitter_api_url: get_env_or_default("TWITTER_API_URL", DEFAULT_TWITTER_API_URL),
            translate_api_url: get_env_or_default(
                "GOOGLE_TRANSLATE_API_URL",
                DEFAULT_TRANSLATE_API_URL,
            ),
            detect_concurrency: parse_concurrency(
                env::var("TWEETSLANG_DETECT_CONCURRENCY").ok().as_deref(),
            ),
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_concurrency(raw: Option<&str>) -> usize {
    match raw.map(str::trim) {
        None | Some("") => 1,
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                log::warn!("ignoring invalid TWEETSLANG_DETECT_CONCURRENCY={value:?}, using 1");
                1
            }
        },
    }
}
