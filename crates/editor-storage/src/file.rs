//! JSON file storage backend.

use crate::{KeyValueStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key-value storage persisted as a single JSON object of strings.
///
/// The file is read once on open; every write rewrites it through a temp
/// file and rename, so readers never observe a partially written store.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StorageError::Encoding(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = data.len(), "Opened file storage");

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Open the store at `path`, starting empty if the file is unreadable.
    ///
    /// A file that is not a JSON object of strings is logged and overwritten
    /// with an empty store. I/O errors are still returned.
    pub fn open_or_reset(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        match Self::open(&path) {
            Err(StorageError::Encoding(reason)) => {
                warn!(path = %path.display(), reason = %reason, "Resetting unreadable storage file");
                let storage = Self {
                    path,
                    data: Mutex::new(BTreeMap::new()),
                };
                if let Err(e) = storage.persist(&BTreeMap::new()) {
                    warn!(path = %storage.path.display(), error = %e, "Failed to rewrite storage file");
                }
                Ok(storage)
            }
            other => other,
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        let tmp_path = self.temp_path();

        let write_result = (|| -> std::io::Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            std::fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Sibling temp file, unique per process and write.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sequence = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            sequence
        ))
    }
}

impl KeyValueStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, "Setting value");

        let mut data = self.data.lock();
        let previous = data.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&data) {
            // Keep memory in line with what is on disk.
            match previous {
                Some(old) => data.insert(key.to_string(), old),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        debug!(key = %key, "Removing value");

        let mut data = self.data.lock();
        let Some(previous) = data.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&data) {
            data.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }
}
