//! # Observability
//!
//! Logging bootstrap for the SSR editor binaries.
//!
//! Binaries call [`init_with_config`] once at startup and use the standard
//! `tracing` macros everywhere else. Library crates never install a
//! subscriber.
//!
//! With the default `dev` feature, events are written as JSONL to
//! `~/.ssr-editor/logs/dev.jsonl` (or [`LogConfig::log_path`]); follow them
//! with `tail -f ~/.ssr-editor/logs/dev.jsonl | jq`. Without it, or when the
//! file cannot be opened, events go to stderr.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "cli".into(),
//!     default_level: "debug".into(),
//!     ..Default::default()
//! });
//! ```

mod file;
mod json_layer;

use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file::LogFile;
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written into every log line.
    pub service_name: String,

    /// Filter used when `RUST_LOG` is unset (e.g. "info", "debug").
    pub default_level: String,

    /// JSONL file location. Defaults to `~/.ssr-editor/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "ssr-editor".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

impl LogConfig {
    /// The configured log file, or the default under the home directory.
    pub fn resolved_log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_default()
                .join(".ssr-editor")
                .join("logs")
                .join("dev.jsonl")
        })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_level))
    }
}

/// Install the global subscriber.
///
/// Never panics. A second call leaves the first subscriber in place.
pub fn init_with_config(config: LogConfig) {
    let log_file = if cfg!(feature = "dev") {
        let path = config.resolved_log_path();
        match LogFile::open(&path) {
            Ok(log_file) => Some(log_file),
            Err(e) => {
                eprintln!("failed to open log file {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    };

    let json_layer = log_file.map(|log_file| {
        JsonLayer::new(config.service_name.clone(), log_file).with_filter(config.env_filter())
    });

    let stderr_layer = (config.also_stderr || json_layer.is_none()).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(config.env_filter())
    });

    let file_logging = json_layer.is_some();
    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed && file_logging {
        tracing::debug!(service = %config.service_name, "Logging initialized");
    }
}
