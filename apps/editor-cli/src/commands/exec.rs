//! Remote code execution command.

use super::{failure, Context};
use crate::output::{self, OutputFormat};
use anyhow::{Context as _, Result};
use serde_json::json;
use std::io::Read;
use std::path::Path;

/// Read source from a file, or stdin for `-`.
fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    let path = Path::new(source);
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Run a source file on the execution service and print its output.
pub async fn exec(ctx: &Context, source: &str) -> Result<()> {
    let code = read_source(source)?;
    let client = ctx.document_client()?;

    match client.execute_remote_code(&code).await {
        Some(stdout) => {
            match ctx.format {
                OutputFormat::Text => print!("{}", stdout),
                OutputFormat::Json => output::print_json(&json!({ "output": stdout }))?,
            }
            Ok(())
        }
        None => Err(failure(&client, "Execution service error")),
    }
}
