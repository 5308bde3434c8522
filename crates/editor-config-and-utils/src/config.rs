//! Client configuration.
//!
//! Resolution order, later wins: built-in defaults, `config.json`, then the
//! `EDITOR_API_URL`, `EDITOR_EXEC_URL` and `EDITOR_LOG_LEVEL` environment
//! variables.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default document API URL. Set `EDITOR_API_URL` at build time to change it.
pub const DEFAULT_API_URL: &str = match option_env!("EDITOR_API_URL") {
    Some(url) => url,
    None => "http://localhost:1337",
};

/// Default code execution service URL. Set `EDITOR_EXEC_URL` at build time to change it.
pub const DEFAULT_EXEC_URL: &str = match option_env!("EDITOR_EXEC_URL") {
    Some(url) => url,
    None => "https://execjs.emilfolino.se",
};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where the client talks to and how loudly it logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    /// Base URL of the document REST API, without trailing slash.
    pub api_url: String,
    /// Base URL of the code execution service, without trailing slash.
    pub exec_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.into(),
            api_url: DEFAULT_API_URL.into(),
            exec_url: DEFAULT_EXEC_URL.into(),
        }
    }
}

impl Config {
    /// Load `config.json` if present, then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let path = paths.config_file();
        let mut config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.normalize();
        Ok(config)
    }

    /// Load a config file without environment overrides.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let mut config: Config = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.normalize();
        Ok(config)
    }

    /// Write this configuration to `config.json`.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        std::fs::write(paths.config_file(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides = [
            ("EDITOR_LOG_LEVEL", &mut self.log_level),
            ("EDITOR_API_URL", &mut self.api_url),
            ("EDITOR_EXEC_URL", &mut self.exec_url),
        ];
        for (name, field) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *field = value.trim().to_string();
            }
        }
    }

    fn normalize(&mut self) {
        for url in [&mut self.api_url, &mut self.exec_url] {
            let trimmed = url.trim_end_matches('/').len();
            url.truncate(trimmed);
        }
    }

    /// The document API URL, validated.
    pub fn api_url(&self) -> CoreResult<Url> {
        parse_http_url(&self.api_url)
    }

    /// The execution service URL, validated.
    pub fn exec_url(&self) -> CoreResult<Url> {
        parse_http_url(&self.exec_url)
    }
}

fn parse_http_url(raw: &str) -> CoreResult<Url> {
    let url = Url::parse(raw)?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(CoreError::Config(format!(
            "{} must be an http or https URL",
            raw
        )))
    }
}
