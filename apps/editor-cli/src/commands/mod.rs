//! CLI command implementations.

mod auth;
mod config;
mod docs;
mod exec;

pub use auth::{login, logout, signup, status};
pub use config::{config_init, config_show};
pub use docs::{docs_create, docs_list, docs_share, docs_show, docs_update};
pub use exec::exec;

use crate::output::OutputFormat;
use anyhow::{Context as _, Result};
use editor_auth::SessionManager;
use editor_config_and_utils::{Config, Paths};
use editor_docs::DocumentClient;
use editor_storage::FileStorage;
use std::io::{self, Write};
use std::sync::Arc;

/// Everything a command needs: resolved paths, config and output format.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    /// Session manager backed by the on-disk session store.
    ///
    /// An unreadable session file is reset, which leaves the user logged out.
    pub fn session_manager(&self) -> Result<Arc<SessionManager>> {
        let path = self.paths.session_file();
        let storage = FileStorage::open_or_reset(&path)
            .with_context(|| format!("Failed to open session store {}", path.display()))?;
        Ok(Arc::new(SessionManager::new(
            Arc::new(storage),
            &self.config.api_url,
        )))
    }

    /// Document client authenticated through the stored session.
    pub fn document_client(&self) -> Result<DocumentClient> {
        let session = self.session_manager()?;
        Ok(DocumentClient::new(
            &self.config.api_url,
            &self.config.exec_url,
            session,
        ))
    }
}

/// Read one trimmed line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// The operation's error slot, or a generic message.
fn failure(client: &DocumentClient, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(client.error().unwrap_or_else(|| fallback.to_string()))
}
