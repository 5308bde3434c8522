//! On-disk layout of the editor client.
//!
//! ```text
//! ~/.ssr-editor/
//!   config.json     client configuration
//!   session.json    durable session store (token + user)
//!   logs/dev.jsonl  structured logs
//! ```

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

const BASE_DIR_NAME: &str = ".ssr-editor";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";
const LOGS_DIR: &str = "logs";
const LOG_FILE: &str = "dev.jsonl";

/// Resolves every file the client reads or writes.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Paths rooted at `~/.ssr-editor`.
    pub fn new() -> CoreResult<Self> {
        dirs::home_dir()
            .map(|home| Self::with_base_dir(home.join(BASE_DIR_NAME)))
            .ok_or_else(|| CoreError::Path("no home directory to place .ssr-editor in".into()))
    }

    /// Paths rooted at `base_dir` (used by `--base-dir` and tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Backing file of the durable session store.
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join(SESSION_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join(LOGS_DIR)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE)
    }

    /// Create the base and log directories if missing.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
