//! Authentication error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Authentication error type.
///
/// Never surfaced past `SessionManager`'s public operations; they log it and
/// return `None` instead.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The auth endpoint answered with a non-success status
    #[error("{message} ({status})")]
    Rejected { status: StatusCode, message: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// A successful login that did not carry both a token and a user
    #[error("Login response has no {0}")]
    IncompleteSession(&'static str),
}

impl AuthError {
    /// Returns true if the server refused the credentials.
    pub fn is_rejected(&self) -> bool {
        matches!(self, AuthError::Rejected { .. })
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
