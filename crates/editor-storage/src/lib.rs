//! Durable session storage for the SSR editor client.
//!
//! This crate provides:
//! - **`KeyValueStorage`**: the get/set/remove abstraction the session layer persists through
//! - **`FileStorage`**: a JSON file store, the desktop analogue of browser local storage
//! - **`MemoryStorage`**: a process-local store for tests and embedding
//! - **`SessionStore`**: typed token/user persistence under fixed keys

mod file;
mod keys;
mod memory;
mod session_store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use session_store::{SessionStore, StoredSession};
pub use traits::KeyValueStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Encoding(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
