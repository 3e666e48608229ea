//! # Environment-Based Configuration
//!
//! Loads client settings from environment variables so the same binary can
//! point at a local API during development and the hosted one in the field.
//!
//! ## Environment Variables
//!
//! - `RESPOND_API_BASE` - Base URL of the RESPOND API (default: `http://127.0.0.1:8000`)
//! - `RESPOND_REQUEST_TIMEOUT_SECS` - Timeout for JSON requests (default: 30)
//! - `RESPOND_UPLOAD_TIMEOUT_SECS` - Timeout for image/audio uploads (default: 120)
//! - `RESPOND_DEFAULT_SEARCH_LIMIT` - Result limit when none is given (default: 10)

use std::{env, time::Duration};
use url::Url;

/// Default API location when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Validated client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: Url,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    pub default_search_limit: u32,
}

/// Builder for [`ClientConfig`] with environment variable support
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    api_base: String,
    request_timeout_secs: u64,
    upload_timeout_secs: u64,
    default_search_limit: u32,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 30,
            upload_timeout_secs: 120,
            default_search_limit: 10,
        }
    }
}

impl ClientConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(base) = get_env_string("RESPOND_API_BASE") {
            builder = builder.api_base(base);
        }
        if let Some(timeout) = get_env_u64("RESPOND_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout_secs(timeout);
        }
        if let Some(timeout) = get_env_u64("RESPOND_UPLOAD_TIMEOUT_SECS")? {
            builder = builder.upload_timeout_secs(timeout);
        }
        if let Some(limit) = get_env_u32("RESPOND_DEFAULT_SEARCH_LIMIT")? {
            builder = builder.default_search_limit(limit);
        }

        Ok(builder)
    }

    /// Set the API base URL
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Set JSON request timeout in seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = timeout;
        self
    }

    /// Set upload timeout in seconds
    #[must_use]
    pub fn upload_timeout_secs(mut self, timeout: u64) -> Self {
        self.upload_timeout_secs = timeout;
        self
    }

    /// Set the search limit used when a request does not give one
    #[must_use]
    pub fn default_search_limit(mut self, limit: u32) -> Self {
        self.default_search_limit = limit;
        self
    }

    /// Validate configuration and build `ClientConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_base = Url::parse(self.api_base.trim()).map_err(|e| {
            ConfigError::ValidationError(format!("api_base '{}' is not a URL: {}", self.api_base, e))
        })?;

        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "api_base must use http or https, got '{}'",
                api_base.scheme()
            )));
        }
        validate_timeout("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout("upload_timeout_secs", self.upload_timeout_secs)?;
        if !(1..=100).contains(&self.default_search_limit) {
            return Err(ConfigError::ValidationError(
                "default_search_limit must be between 1 and 100".to_string(),
            ));
        }

        Ok(ClientConfig {
            api_base,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            upload_timeout: Duration::from_secs(self.upload_timeout_secs),
            default_search_limit: self.default_search_limit,
        })
    }
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be greater than 0"
        )));
    }
    if secs > 600 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be <= 600 (10 minutes)"
        )));
    }
    Ok(())
}

// Environment variable helper functions

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn get_env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match get_env_string(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid integer '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

fn get_env_u32(key: &str) -> Result<Option<u32>, ConfigError> {
    match get_env_string(key) {
        Some(val) => val
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid integer '{val}': {e}"),
            }),
        None => Ok(None),
    }
}
