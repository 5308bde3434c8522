//! Configuration commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;

/// Show the effective configuration.
pub async fn config_show(ctx: &Context) -> Result<()> {
    match ctx.format {
        OutputFormat::Text => {
            output::print_heading("Configuration");
            output::print_row("Config file", &ctx.paths.config_file().display().to_string());
            output::print_row("API", &ctx.config.api_url);
            output::print_row("Exec service", &ctx.config.exec_url);
            output::print_row("Log level", &ctx.config.log_level);
        }
        OutputFormat::Json => output::print_json(&ctx.config)?,
    }
    Ok(())
}

/// Write the effective configuration to the config file.
pub async fn config_init(ctx: &Context) -> Result<()> {
    ctx.config.api_url()?;
    ctx.config.exec_url()?;
    ctx.config.save(&ctx.paths)?;
    output::print_success(
        &format!("Wrote {}", ctx.paths.config_file().display()),
        &ctx.format,
    );
    Ok(())
}
