//! RESPOND client error types
//!
//! The API reports failures as `{"detail": "..."}` with an HTTP status.
//! Those become [`RespondError::Api`]; transport, decoding and local
//! validation failures get their own variants.

use crate::config::ConfigError;
use respond_core::CoreError;
use serde::Deserialize;
use thiserror::Error;

/// Result type for RESPOND client operations
pub type RespondResult<T> = Result<T, RespondError>;

/// Errors that can occur while talking to the RESPOND API
#[derive(Debug, Error)]
pub enum RespondError {
    /// The API rejected the request
    #[error("{detail} (HTTP {status})")]
    Api { status: u16, detail: String },

    /// Requested incident or deployment does not exist
    #[error("Not found: {detail}")]
    NotFound { detail: String },

    /// Request failed local validation before being sent
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Connection error
    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    /// Request timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Response did not match the expected contract
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Reading a file for upload failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Result store rejected a response
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RespondError {
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RespondError::ConnectionError { .. } | RespondError::Timeout { .. } => true,
            RespondError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this error only means a newer search replaced this one
    pub fn is_stale(&self) -> bool {
        matches!(self, RespondError::Core(err) if err.is_stale())
    }

    /// HTTP status the API answered with, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RespondError::Api { status, .. } => Some(*status),
            RespondError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Error body returned by the API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Extract a readable message; validation errors carry a list of objects
    pub(crate) fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            serde_json::Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}
