//! Document model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A document as returned by the API.
///
/// The collection has been served under both `_id` and `id`; either may be
/// present. Fields the client does not model are kept in `extra` so a
/// document round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Alternate identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `null` text field reads as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// The document's identifier, preferring `_id`.
    pub fn identifier(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    /// Whether either identifier field equals `id`.
    pub fn matches_id(&self, id: &str) -> bool {
        self.object_id.as_deref() == Some(id) || self.id.as_deref() == Some(id)
    }
}

/// Payload for creating or updating a document.
///
/// Unset fields are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Add a server-defined field.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}
