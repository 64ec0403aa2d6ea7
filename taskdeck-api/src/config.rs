/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3001)
/// - `JWT_SECRET`: Secret shared with the identity provider (required)
/// - `CORS_ORIGIN`: Comma-separated origins allowed in addition to the local dev servers
/// - `API_PRODUCTION`: Enables HSTS and disables demo seeding (default: false)
/// - `API_SEED_DEMO`: Seeds a demo organization on startup (default: !production)
/// - `RUST_LOG`: Log level (default: taskdeck_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Origins of the local web front-ends, always allowed
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
    "http://localhost:4200",
];

/// Default API port
pub const DEFAULT_PORT: u16 = 3001;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,

    /// Seed a demo organization on startup
    pub seed_demo: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret used to verify session tokens
    ///
    /// IMPORTANT: This must match the identity provider's signing secret and
    /// should be at least 32 bytes.
    pub secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - `API_PORT` is not a valid port number
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let production = parse_flag(env::var("API_PRODUCTION").ok().as_deref(), false);
        let seed_demo = parse_flag(env::var("API_SEED_DEMO").ok().as_deref(), !production);

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins: cors_origins(env::var("CORS_ORIGIN").ok().as_deref()),
                production,
                seed_demo,
            },
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    /// Configuration for tests and local tooling
    pub fn for_secret(secret: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
                cors_origins: cors_origins(None),
                production: false,
                seed_demo: false,
            },
            jwt: JwtConfig {
                secret: secret.into(),
            },
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Builds the allowed origin list from the defaults plus `CORS_ORIGIN`
pub fn cors_origins(extra: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect();

    for origin in extra.unwrap_or_default().split(',') {
        let origin = origin.trim();
        if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }

    origins
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let mut config = Config::for_secret("test-secret-key-at-least-32-bytes-long");
        config.api.port = 8080;

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_cors_origins_defaults() {
        let origins = cors_origins(None);
        assert_eq!(origins.len(), 4);
        assert!(origins.contains(&"http://localhost:4200".to_string()));
    }

    #[test]
    fn test_cors_origins_extra() {
        let origins = cors_origins(Some("https://app.example.com, https://admin.example.com,,http://localhost:5173"));

        assert_eq!(origins.len(), 6);
        assert_eq!(origins[4], "https://app.example.com");
        assert_eq!(origins[5], "https://admin.example.com");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("true"), false));
        assert!(parse_flag(Some(" YES "), false));
        assert!(!parse_flag(Some("0"), true));
        assert!(parse_flag(Some("maybe"), true));
        assert!(!parse_flag(None, false));
    }
}
