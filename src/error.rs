// src/error.rs
//! Application error types with structured error handling.
//!
//! Only configuration problems are fatal to a run. Everything the Notion API
//! can throw at the collector is classified here so callers can degrade
//! (record a missing database, truncate sampling) instead of aborting.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::RestrictedResource,
            404 => Self::ObjectNotFound,
            429 => Self::RateLimited,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error means the resource doesn't exist (or isn't shared).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }

    /// Whether the integration is not allowed to see the resource.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::RestrictedResource | Self::Unauthorized)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: u16,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl AppError {
    /// The only class of error that aborts a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::MissingConfiguration(_) | AppError::ValidationError(_)
        )
    }
}

/// Why a database could not be fetched.
///
/// Not an error type: a classification attached to each missing-access
/// entry so the report can say more than "it failed".
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseFetchFailure {
    /// The database is a linked database (Notion API limitation).
    LinkedDatabase,
    /// The integration lacks permission to access this database.
    PermissionDenied { reason: String },
    /// The database was not found, or is not shared with the integration.
    NotFound,
    /// Some other failure occurred.
    Other { cause: String },
}

impl fmt::Display for DatabaseFetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkedDatabase => write!(
                f,
                "linked database (Notion API does not support retrieving linked databases)"
            ),
            Self::PermissionDenied { reason } => write!(f, "permission denied: {}", reason),
            Self::NotFound => write!(f, "database not found"),
            Self::Other { cause } => write!(f, "{}", cause),
        }
    }
}

/// Classifies a database fetch error into a domain-specific failure reason.
pub fn classify_database_fetch_failure(error: &AppError) -> DatabaseFetchFailure {
    match error {
        AppError::NotionService { code, message, .. } => {
            if message.contains("linked database") {
                DatabaseFetchFailure::LinkedDatabase
            } else if code.is_not_found() {
                DatabaseFetchFailure::NotFound
            } else if code.is_permission_denied() {
                DatabaseFetchFailure::PermissionDenied {
                    reason: message.clone(),
                }
            } else {
                DatabaseFetchFailure::Other {
                    cause: error.to_string(),
                }
            }
        }
        _ => DatabaseFetchFailure::Other {
            cause: error.to_string(),
        },
    }
}
