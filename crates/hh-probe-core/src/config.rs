//! Probe configuration
//!
//! Read once at process entry and passed explicitly to the client.
//! Only `HH_API_KEY` is required; the endpoint and timeout have defaults.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::credential::ApiKey;
use crate::error::{ProbeError, Result};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "HH_API_KEY";
/// Environment variable overriding the API base URL
pub const ENDPOINT_VAR: &str = "HH_API_ENDPOINT";
/// Environment variable overriding the request timeout in seconds
pub const TIMEOUT_VAR: &str = "HH_API_TIMEOUT_SECS";

/// Default hh.ru API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.hh.ru/";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved probe configuration
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Credential sent as a bearer token
    pub api_key: ApiKey,
    /// API base URL, always ending with `/`
    pub endpoint: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl ProbeConfig {
    /// Build a configuration from already-resolved values
    pub fn new(api_key: Option<&str>, endpoint: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        let api_key = ApiKey::new(api_key.unwrap_or_default())?;

        let endpoint = parse_endpoint(endpoint.unwrap_or(DEFAULT_ENDPOINT))?;

        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ProbeError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }

        debug!(
            "Resolved config: endpoint={}, timeout={}s, key={}",
            endpoint,
            timeout_secs,
            api_key.prefix()
        );

        Ok(Self {
            api_key,
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: format!("hh-probe/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR);
        let endpoint = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty());
        let timeout_secs = match lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ProbeError::InvalidConfig(format!("{} must be a whole number, got {:?}", TIMEOUT_VAR, raw))
            })?),
            None => None,
        };

        Self::new(api_key.as_deref(), endpoint.as_deref(), timeout_secs)
    }

    /// Full URL of the vacancies search endpoint
    pub fn vacancies_url(&self) -> Result<Url> {
        self.endpoint
            .join("vacancies")
            .map_err(|e| ProbeError::InvalidConfig(format!("Invalid endpoint: {}", e)))
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    // Url::join drops the last path segment unless the base ends with '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized)
        .map_err(|e| ProbeError::InvalidConfig(format!("Invalid endpoint {:?}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProbeError::InvalidConfig(format!(
            "Unsupported endpoint scheme: {}",
            other
        ))),
    }
}
