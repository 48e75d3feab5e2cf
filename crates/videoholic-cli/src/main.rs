//! Videoholic CLI - Headless Source Resolution Tool
//!
//! Features:
//! - Resolve a source to its stream descriptor and stream handler
//! - Optional Content-Type probing for extensionless URLs
//! - Registry listings in priority order
//! - Capability profiles from flags or a JSON config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

/// Videoholic CLI - media source routing inspector
#[derive(Parser)]
#[command(name = "videoholic")]
#[command(version)]
#[command(about = "Inspect how media sources are routed to stream handlers", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Capability flags: "all", "none", or a comma list of mse,hls,dash,mp4,webm
    #[arg(long, default_value = "all", global = true)]
    caps: String,

    /// JSON controller config file (overrides --caps)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a source and attach it to a headless surface
    Resolve {
        /// URL or path of the media
        source: String,

        /// MIME type hint
        #[arg(short, long)]
        mime: Option<String>,

        /// Take the MIME hint from an HTTP HEAD request
        #[arg(long, conflicts_with = "mime")]
        probe: bool,
    },

    /// List source and stream handlers in priority order
    Handlers,

    /// Show the effective capability flags
    Capabilities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref(), &cli.caps)?;

    match cli.command {
        Commands::Resolve { source, mime, probe } => {
            commands::resolve(config, &source, mime, probe, &cli.format).await?;
        }
        Commands::Handlers => {
            commands::handlers(config, &cli.format)?;
        }
        Commands::Capabilities => {
            commands::capabilities(&config, &cli.format)?;
        }
    }

    Ok(())
}
