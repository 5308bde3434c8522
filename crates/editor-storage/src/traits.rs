//! The storage seam the session layer persists through.

use crate::StorageResult;

/// String-to-string durable store, the analogue of browser local storage.
///
/// Calls are synchronous. Implementations are shared behind an `Arc` and
/// must tolerate concurrent callers; the last write wins.
pub trait KeyValueStorage: Send + Sync {
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete `key`, reporting whether it was present.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    fn has(&self, key: &str) -> StorageResult<bool> {
        self.get(key).map(|value| value.is_some())
    }
}
