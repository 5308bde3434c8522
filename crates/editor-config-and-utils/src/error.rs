//! Errors raised while loading configuration or resolving paths.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A value in the configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `config.json` could not be read or written as JSON.
    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    /// The editor directory could not be located.
    #[error("Cannot resolve editor directory: {0}")]
    Path(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
