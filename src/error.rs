//! Error types for job extraction

use thiserror::Error;

/// Errors that can escape the extraction core
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A configured pattern failed to compile
    #[error("Invalid pattern for {field}: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The local pipeline did not run to completion
    #[error("Extraction failed: {0}")]
    Internal(String),
}

/// Failures of the remote extraction service.
///
/// These never reach the caller of `extract_job_info`; they select the local
/// fallback and are logged.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Remote delegation is switched off
    #[error("remote extraction disabled")]
    Disabled,

    /// Transport-level failure (connection refused, DNS, reset)
    #[error("request failed: {0}")]
    Request(String),

    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Service answered with a non-success status
    #[error("service responded with status {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment value could not be interpreted
    #[error("Invalid value for {key}: {details}")]
    InvalidValue { key: String, details: String },
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
