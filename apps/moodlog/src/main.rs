//! # Moodlog
//!
//! The main binary for the mood dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   apps/moodlog (THE BINARY)               │
//! │                                                           │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────────┐   │
//! │  │    CLI      │   │  HTTP API   │   │ Sync Controller│   │
//! │  │   (clap)    │   │   (axum)    │   │   (reqwest)    │   │
//! │  └──────┬──────┘   └──────┬──────┘   └───────┬────────┘   │
//! │         └─────────────────┼──────────────────┘            │
//! │                           ▼                               │
//! │                   ┌───────────────┐                       │
//! │                   │ moodlog-core  │                       │
//! │                   │ (THE LOGIC)   │                       │
//! │                   └───────────────┘                       │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! moodlog serve --port 8080
//! moodlog summary --history
//! moodlog filter --keyword anxious
//! moodlog export --output mood_log.csv
//! moodlog submit --message "Long day, but I finished the project"
//! ```

use clap::Parser;
use moodlog::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // MOODLOG_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MOODLOG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moodlog=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  moodlog v{}
  how have you been feeling?
"#,
        env!("CARGO_PKG_VERSION")
    );
}
