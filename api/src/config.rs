use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the persisted cookie blob, relative to the home directory.
const DEFAULT_COOKIES_DIR: &str = ".birdfeed";
const DEFAULT_COOKIES_FILE: &str = "cookies.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public web origin used for entry links and feed links
    pub twitter_base_url: String,
    /// Origin of the platform's REST and GraphQL API
    pub twitter_api_url: String,
    /// Where the session cookies are persisted between restarts
    pub cookies_path: PathBuf,
    /// Upper bound for a single inbound request, platform calls included
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            twitter_base_url: env::var("TWITTER_BASE_URL")
                .unwrap_or_else(|_| "https://twitter.com".to_string()),
            twitter_api_url: env::var("TWITTER_API_URL")
                .unwrap_or_else(|_| "https://api.twitter.com".to_string()),
            cookies_path: env::var("BIRDFEED_COOKIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_cookies_path()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// `~/.birdfeed/cookies.json`, or a relative path when no home directory exists
pub fn default_cookies_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_COOKIES_DIR)
        .join(DEFAULT_COOKIES_FILE)
}
