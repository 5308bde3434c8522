//! Document client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Document client error type.
///
/// `DocumentClient`'s public operations never return it; its `Display` text
/// is what lands in the client's error slot.
#[derive(Error, Debug)]
pub enum DocsError {
    /// The API answered with a non-success status
    #[error("{message} ({status})")]
    Status {
        message: &'static str,
        status: StatusCode,
    },

    /// HTTP request error (transport failure or undecodable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured API URL cannot address a document
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Execution output was not valid base64
    #[error("Invalid execution output: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Execution output was not valid UTF-8
    #[error("Invalid execution output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<url::ParseError> for DocsError {
    fn from(e: url::ParseError) -> Self {
        DocsError::InvalidUrl(e.to_string())
    }
}

/// Result type alias using DocsError.
pub type DocsResult<T> = Result<T, DocsError>;
