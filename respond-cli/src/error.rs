//! CLI error type

use respond_client::RespondError;
use respond_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Respond(#[from] RespondError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<respond_client::ConfigError> for CliError {
    fn from(err: respond_client::ConfigError) -> Self {
        Self::Respond(err.into())
    }
}

pub type CliResult<T> = Result<T, CliError>;
