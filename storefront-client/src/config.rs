//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | API_URL | - | Backend base URL (first candidate) |
//! | BACKEND_URL | - | Backend base URL (second candidate) |
//! | SERVER_URL | - | Backend base URL (third candidate) |
//! | API_BASE_URL | - | Backend base URL (fourth candidate) |
//! | STOREFRONT_REQUEST_TIMEOUT_SECS | none | Per-request timeout |
//!
//! The first candidate that is set and non-blank wins; otherwise
//! [`DEFAULT_API_BASE_URL`] is used.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when no candidate variable is set
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";

/// Candidate variables, in precedence order
pub const API_BASE_URL_CANDIDATES: [&str; 4] = ["API_URL", "BACKEND_URL", "SERVER_URL", "API_BASE_URL"];

/// Pick the base URL from the first non-blank candidate.
///
/// `lookup` abstracts the environment so resolution can be tested without
/// touching process state. One trailing slash is stripped.
pub fn resolve_base_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let chosen = API_BASE_URL_CANDIDATES
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    match chosen.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => chosen,
    }
}

/// Client configuration for connecting to the storefront backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL without trailing slash (e.g., "http://localhost:4000")
    pub base_url: String,

    /// Explicit bearer token; takes precedence over `token_path`
    pub token: Option<String>,

    /// File holding the bearer token, read on every request
    pub token_path: Option<PathBuf>,

    /// Request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(&base_url).to_string(),
            token: None,
            token_path: None,
            timeout: None,
        }
    }

    /// Build a configuration from process environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new(resolve_base_url(|name| std::env::var(name).ok()));
        if let Some(secs) = std::env::var("STOREFRONT_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read the bearer token from a file on every request
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
