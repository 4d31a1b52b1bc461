// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use url::Url;

/// API key for Notion API authentication
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keys end up in config dumps; never print the secret.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(10).collect();
        write!(f, "{}...", prefix)
    }
}

/// Base URL of the Notion REST API, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBaseUrl(String);

impl ApiBaseUrl {
    pub const DEFAULT: &'static str = "https://api.notion.com/v1";

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let parsed = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ValidationError::InvalidUrl {
                url: raw.to_string(),
                reason: "Only HTTP and HTTPS URLs are supported".to_string(),
            });
        }

        Ok(Self(parsed.as_str().trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an endpoint path (without leading slash) onto the base.
    pub fn join(&self, endpoint: &str) -> String {
        format!("{}/{}", self.0, endpoint.trim_start_matches('/'))
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
