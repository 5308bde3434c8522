//! SSR Editor CLI - sign in, manage documents and run code from the terminal.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::Context;
use editor_config_and_utils::{init_logging, Config, Paths};
use std::path::PathBuf;
use tracing::debug;

/// SSR Editor CLI - Work with the document API from the terminal.
#[derive(Parser)]
#[command(name = "ssr-editor")]
#[command(about = "SSR Editor CLI for authentication, documents and code execution")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory holding config, session and logs (default ~/.ssr-editor)
    #[arg(long, env = "EDITOR_BASE_DIR", global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Signup {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Check authentication status
    Status,

    /// Manage documents
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },

    /// Run a source file on the execution service ("-" reads stdin)
    Exec {
        /// Path to the source file
        source: String,
    },

    /// Inspect or write the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum DocsCommands {
    /// List documents
    List,
    /// Show a document
    Show {
        /// Document ID
        id: String,
    },
    /// Create a document
    Create {
        /// Document title
        #[arg(short, long)]
        title: String,
        /// Document content
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Update a document
    Update {
        /// Document ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Share a document by mail
    Share {
        /// Document ID
        id: String,
        /// Recipient email
        email: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init,
}

fn load_context(cli: &Cli) -> anyhow::Result<Context> {
    let paths = match &cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir.clone()),
        None => Paths::new()?,
    };
    paths.ensure_dirs()?;
    let config = Config::load(&paths)?;

    Ok(Context {
        paths,
        config,
        format: cli.format,
    })
}

async fn run(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email } => commands::login(ctx, email).await,
        Commands::Signup { email } => commands::signup(ctx, email).await,
        Commands::Logout => commands::logout(ctx).await,
        Commands::Status => commands::status(ctx).await,
        Commands::Docs { command } => match command {
            DocsCommands::List => commands::docs_list(ctx).await,
            DocsCommands::Show { id } => commands::docs_show(ctx, &id).await,
            DocsCommands::Create { title, content } => {
                commands::docs_create(ctx, title, content).await
            }
            DocsCommands::Update { id, title, content } => {
                commands::docs_update(ctx, &id, title, content).await
            }
            DocsCommands::Share { id, email } => commands::docs_share(ctx, &id, &email).await,
        },
        Commands::Exec { source } => commands::exec(ctx, &source).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config_show(ctx).await,
            ConfigCommands::Init => commands::config_init(ctx).await,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let ctx = match load_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::print_error(&format!("{:#}", e), &cli.format);
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| ctx.config.log_level.clone());
    init_logging("cli", &level, &ctx.paths, false);
    debug!(api_url = %ctx.config.api_url, "CLI started");

    if let Err(e) = run(&ctx, cli.command).await {
        output::print_error(&format!("{:#}", e), &ctx.format);
        std::process::exit(1);
    }
}
