//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GEARSTOCK_API_URL` - Base URL of the remote product service
//!
//! ## Optional
//! - `GEARSTOCK_DATA_DIR` - Directory for persisted state (default: `.gearstock`)
//! - `GEARSTOCK_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".gearstock";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gearstock client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote product service. Endpoints live under `/api`.
    pub api_base_url: Url,
    /// Directory holding the session file and the catalog snapshot.
    pub data_dir: PathBuf,
    /// Timeout applied to every remote request.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `GEARSTOCK_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url("GEARSTOCK_API_URL", &get_required_env("GEARSTOCK_API_URL")?)?;
        let data_dir = PathBuf::from(get_env_or_default("GEARSTOCK_DATA_DIR", DEFAULT_DATA_DIR));
        let timeout_secs = get_env_or_default(
            "GEARSTOCK_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("GEARSTOCK_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build an API endpoint URL under the service's `/api` prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        format!("{base}/api/{path}")
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and sanity-check a base URL.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "URL must have a host".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig {
            api_base_url: Url::parse(base).expect("url"),
            data_dir: PathBuf::from(".gearstock"),
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("TEST_VAR", "https://parts.example.com").expect("parse");
        assert_eq!(url.host_str(), Some("parts.example.com"));
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let result = parse_base_url("TEST_VAR", "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_base_url_no_host() {
        let result = parse_base_url("TEST_VAR", "unix:/run/socket");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(
            config("https://parts.example.com").endpoint("products"),
            "https://parts.example.com/api/products"
        );
        // Trailing slash on the base must not double up
        assert_eq!(
            config("https://parts.example.com/").endpoint("auth/login"),
            "https://parts.example.com/api/auth/login"
        );
    }
}
