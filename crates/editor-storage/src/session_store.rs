//! Typed persistence for the authenticated session.

use crate::{KeyValueStorage, StorageKeys, StorageResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Token and user record as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: Value,
}

/// High-level API for storing and retrieving the session.
///
/// The token is stored as a plain string under [`StorageKeys::TOKEN`], the
/// user record as JSON under [`StorageKeys::USER`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Create a new session store over the given storage backend
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when logged out. A stored user of `null`, an empty
    /// token, or only one of the two keys being present all count as logged
    /// out.
    pub fn load(&self) -> StorageResult<Option<StoredSession>> {
        let token = self
            .storage
            .get(StorageKeys::TOKEN)?
            .filter(|t| !t.is_empty());
        let user = match self.storage.get(StorageKeys::USER)? {
            Some(json) => Some(serde_json::from_str::<Value>(&json)?).filter(|u| !u.is_null()),
            None => None,
        };

        match (token, user) {
            (Some(token), Some(user)) => {
                debug!("Loaded stored session");
                Ok(Some(StoredSession { token, user }))
            }
            (None, None) => Ok(None),
            (token, user) => {
                warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "Ignoring incomplete stored session"
                );
                Ok(None)
            }
        }
    }

    /// Persist token and user together.
    pub fn save(&self, token: &str, user: &Value) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(StorageKeys::TOKEN, token)?;
        self.storage.set(StorageKeys::USER, &user_json)?;
        Ok(())
    }

    /// Remove both session keys.
    ///
    /// Both removals are attempted; the first failure is returned.
    pub fn clear(&self) -> StorageResult<()> {
        let token = self.storage.remove(StorageKeys::TOKEN);
        let user = self.storage.remove(StorageKeys::USER);
        token?;
        user?;
        Ok(())
    }
}
