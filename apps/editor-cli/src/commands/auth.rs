//! Authentication commands.

use super::{prompt_line, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde_json::{json, Value};

/// Email from the flag, or prompted.
fn email_or_prompt(email: Option<String>) -> Result<String> {
    let email = match email {
        Some(email) => email.trim().to_string(),
        None => prompt_line("Email: ")?,
    };
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }
    Ok(email)
}

fn password_prompt() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}

/// Best display name for a user record.
fn display_user(user: Option<&Value>) -> String {
    user.and_then(|u| {
        u.get("email")
            .or_else(|| u.get("_id"))
            .or_else(|| u.get("id"))
            .and_then(Value::as_str)
    })
    .unwrap_or("user")
    .to_string()
}

/// Login with email and password.
pub async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    let manager = ctx.session_manager()?;

    if manager.is_logged_in() {
        let user = manager.user();
        output::print_success(
            &format!("Already logged in as {}", display_user(user.as_ref())),
            &ctx.format,
        );
        return Ok(());
    }

    let email = email_or_prompt(email)?;
    let password = password_prompt()?;

    match manager.login(&email, &password).await {
        Some(response) => {
            output::print_success(
                &format!("Logged in as {}", display_user(Some(&response.user))),
                &ctx.format,
            );
            Ok(())
        }
        None => anyhow::bail!(
            "Login failed (details in {})",
            ctx.paths.log_file().display()
        ),
    }
}

/// Register a new account. Does not log in.
pub async fn signup(ctx: &Context, email: Option<String>) -> Result<()> {
    let manager = ctx.session_manager()?;
    let email = email_or_prompt(email)?;
    let password = password_prompt()?;

    match manager.signup(&email, &password).await {
        Some(response) => {
            match ctx.format {
                OutputFormat::Text => {
                    println!("Account created for {}", email);
                    println!("Log in with 'ssr-editor login --email {}'", email);
                }
                OutputFormat::Json => output::print_json(&response)?,
            }
            Ok(())
        }
        None => anyhow::bail!(
            "Signup failed (details in {})",
            ctx.paths.log_file().display()
        ),
    }
}

/// Logout and clear the stored session.
pub async fn logout(ctx: &Context) -> Result<()> {
    let manager = ctx.session_manager()?;
    manager.logout();
    output::print_success("Logged out successfully", &ctx.format);
    Ok(())
}

/// Show authentication status and configured endpoints.
pub async fn status(ctx: &Context) -> Result<()> {
    let manager = ctx.session_manager()?;
    let session = manager.current_session();

    match ctx.format {
        OutputFormat::Text => {
            output::print_heading("SSR Editor");
            if session.is_authenticated() {
                output::print_row("Auth", "logged in");
                output::print_row("User", &display_user(session.user.as_ref()));
            } else {
                output::print_row("Auth", "not logged in");
            }
            output::print_row("API", &ctx.config.api_url);
            output::print_row("Exec service", &ctx.config.exec_url);
            output::print_row("Session file", &ctx.paths.session_file().display().to_string());
        }
        OutputFormat::Json => {
            output::print_json(&json!({
                "logged_in": session.is_authenticated(),
                "user": session.user,
                "api_url": ctx.config.api_url,
                "exec_url": ctx.config.exec_url,
            }))?;
        }
    }

    Ok(())
}
