//! Terminal output in text or JSON form.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn status_line(status: &str, message: &str) -> Value {
    json!({ "status": status, "message": message })
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Confirmation of a completed command, on stdout.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => println!("{}", status_line("success", message)),
    }
}

/// Failure of a command, on stderr.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => eprintln!("{}", status_line("error", message)),
    }
}

/// Title followed by an underline.
pub fn print_heading(text: &str) {
    println!("\n{}\n{}", text, "-".repeat(text.chars().count().max(20)));
}

/// Aligned `label: value` line.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<14} {}", format!("{}:", label), value);
}
