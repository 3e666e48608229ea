//! Error types for the result model and store.

use thiserror::Error;

/// Errors raised by typed parsing and the result store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Sort key string not recognized
    #[error("Unknown sort key: {key}")]
    UnknownSortKey { key: String },

    /// A field value outside the set the API accepts
    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// A search response arrived after a newer search was started
    #[error("Stale search response: generation {generation} superseded by {latest}")]
    StaleResponse { generation: u64, latest: u64 },
}

impl CoreError {
    pub fn unknown_sort_key(key: impl Into<String>) -> Self {
        Self::UnknownSortKey { key: key.into() }
    }

    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// Check if this error only signals a superseded response
    pub fn is_stale(&self) -> bool {
        matches!(self, CoreError::StaleResponse { .. })
    }
}
