//! # Moodlog CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Start the dashboard API
//! - `summary` - Counts, percentages, trend and summary label
//! - `filter` - Case-insensitive keyword search over messages
//! - `export` - Write the history (or a filtered view) as CSV
//! - `submit` - Send one message to the backend for analysis
//!
//! Every one-shot command performs a single refresh before it runs.

mod commands;

use crate::config::{Config, ConfigError};
use crate::source::SourceError;
use crate::sync::RefreshError;
use clap::{Parser, Subcommand};
use moodlog_core::MoodError;
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

/// Anything that can end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error(transparent)]
    Mood(#[from] MoodError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Moodlog - mood dashboard for a sentiment-analysis backend
///
/// Pulls the backend's mood log and reports what it contains.
#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to ./moodlog.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the sentiment backend (overrides config and env)
    #[arg(short = 'S', long, global = true)]
    pub source_url: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dashboard API
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show counts, percentages and the summary label
    Summary {
        /// Also print the history table
        #[arg(long)]
        history: bool,

        /// Order the trend by timestamp instead of producer order
        #[arg(long)]
        chronological: bool,
    },

    /// Show records whose message contains a keyword
    Filter {
        /// Keyword (case-insensitive)
        #[arg(short, long)]
        keyword: String,
    },

    /// Export the history as CSV
    Export {
        /// Output file path (defaults to the configured export filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export only records matching this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Submit a message for sentiment analysis
    Submit {
        /// The journal entry to analyze
        #[arg(short, long)]
        message: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve the configuration layers, CLI flags last.
pub fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.source_url {
        config.source.base_url.clone_from(url);
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let mut config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config).await
        }
        Some(Commands::Summary {
            history,
            chronological,
        }) => cmd_summary(&config, json_mode, history, chronological).await,
        Some(Commands::Filter { keyword }) => cmd_filter(&config, json_mode, &keyword).await,
        Some(Commands::Export { output, keyword }) => {
            let output = output.unwrap_or_else(|| PathBuf::from(&config.export.filename));
            cmd_export(&config, &output, keyword.as_deref()).await
        }
        Some(Commands::Submit { message }) => cmd_submit(&config, json_mode, &message).await,
        None => cmd_summary(&config, json_mode, false, false).await,
    }
}
