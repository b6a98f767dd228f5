//! API key handling

use reqwest::header::HeaderValue;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ProbeError, Result};

/// hh.ru API key - automatically zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Wrap a raw key, rejecting empty values and values that cannot be
    /// sent in an `Authorization` header
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let mut value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            value.zeroize();
            return Err(ProbeError::MissingCredential);
        }
        let key = Self {
            value: trimmed.to_string(),
        };
        value.zeroize();

        if HeaderValue::from_str(&key.bearer()).is_err() {
            return Err(ProbeError::InvalidConfig(
                "HH_API_KEY contains characters not allowed in an HTTP header".to_string(),
            ));
        }
        Ok(key)
    }

    /// Get the key value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// First characters of the key, safe for logs
    pub fn prefix(&self) -> String {
        let head: String = self.value.chars().take(4).collect();
        format!("{}...", head)
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
