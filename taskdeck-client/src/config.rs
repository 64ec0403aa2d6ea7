/// Client configuration
///
/// # Environment Variables
///
/// - `TASKDECK_API_URL`: API base including the `/api` prefix (default: http://localhost:3001/api)
/// - `TASKDECK_ACCESS_TOKEN`: Session token obtained from the identity provider (optional)
/// - `TASKDECK_HTTP_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
/// - `RUST_LOG`: Log level (default: taskdeck_client=debug)

use std::env;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub api_url: String,

    /// Pre-issued session token
    pub access_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with default settings
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `TASKDECK_HTTP_TIMEOUT_SECS` is not a number
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("TASKDECK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = env::var("TASKDECK_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()?;

        let mut config = Self::new(api_url);
        config.access_token = env::var("TASKDECK_ACCESS_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = Duration::from_secs(timeout_secs);

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
