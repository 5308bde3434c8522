//! Logging setup for editor binaries.
//!
//! Every binary logs JSONL to `<base_dir>/logs/dev.jsonl` through the
//! observability package. `RUST_LOG` overrides the configured level.

use crate::Paths;
use observability::LogConfig;
use tracing::Level;

/// Install the global subscriber for a binary.
///
/// `level` is one of trace, debug, info, warn, error; anything else means
/// info. Set `also_stderr` to mirror events to the terminal.
///
/// ```ignore
/// init_logging("cli", &config.log_level, &paths, false);
/// ```
pub fn init_logging(service_name: &str, level: &str, paths: &Paths, also_stderr: bool) {
    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: parse_level(level).as_str().to_ascii_lowercase(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}

/// Parse a configured level name. Unknown names fall back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    let level = level.trim();
    if level.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    level.parse().unwrap_or(Level::INFO)
}
