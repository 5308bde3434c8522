//! Shared helpers for handling API responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Deserialize;

/// Summarize a response body for logs without writing its contents.
pub fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: Option<String>,
}

/// The `message` field of a JSON error body, if there is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.trim().is_empty())
}
