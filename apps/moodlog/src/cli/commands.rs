//! # CLI Command Implementations

use super::CliError;
use crate::api;
use crate::config::Config;
use crate::source::HttpLogSource;
use crate::sync::SyncController;
use moodlog_core::{
    Dashboard, Keyword, MoodCategory, MoodRecord, MoodStore, export_csv, sort_chronologically,
    trend_axis_label,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the controller used by every command.
fn controller(config: &Config) -> Result<SyncController, CliError> {
    let source = HttpLogSource::new(&config.source)?;
    Ok(SyncController::new(Arc::new(source)))
}

/// Refresh once and hand back the resulting snapshot.
async fn load_store(config: &Config) -> Result<MoodStore, CliError> {
    let sync = controller(config)?;
    sync.refresh().await?;
    let snapshot = sync.reader().read().await.clone();
    Ok(snapshot)
}

/// Resolve the output path's parent so a bad directory fails before export.
fn validate_output_path(path: &Path) -> Result<PathBuf, CliError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let canonical_parent = parent.canonicalize()?;
    let filename = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path '{}' has no filename", path.display()),
        )
    })?;
    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the dashboard API.
pub async fn cmd_serve(config: &Config) -> Result<(), CliError> {
    let sync = controller(config)?;

    println!("Moodlog dashboard API starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", config.bind_addr());
    println!("  Backend:  {}", config.source.base_url);
    println!();
    println!("Endpoints:");
    println!("  GET  /summary          - Counts, percentages, trend");
    println!("  GET  /records          - Full history");
    println!("  GET  /records/filter   - Keyword search");
    println!("  GET  /export           - CSV download");
    println!("  POST /refresh          - Pull the latest log");
    println!("  GET  /status           - Sync state");
    println!("  GET  /health           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config, sync).await?;
    Ok(())
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Print the dashboard snapshot.
pub async fn cmd_summary(
    config: &Config,
    json_mode: bool,
    history: bool,
    chronological: bool,
) -> Result<(), CliError> {
    let store = load_store(config).await?;
    let mut dashboard = store.dashboard();
    if chronological {
        sort_chronologically(&mut dashboard.trend);
    }

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    print_dashboard(&dashboard);
    if history {
        println!();
        print_history(store.records().iter());
    }
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Mood Summary");
    println!("============");
    println!(
        "  Records:  {} ({} unrecognized)",
        dashboard.total_records, dashboard.unrecognized_records
    );
    for category in MoodCategory::ALL {
        println!(
            "  {:<9} {:>4} ({:.1}%)",
            format!("{}:", category.display_name()),
            dashboard.counts.get(category),
            dashboard.percentages.get(category)
        );
    }
    println!();
    println!("  {}", dashboard.summary.headline());

    if !dashboard.trend.is_empty() {
        println!();
        println!("Trend");
        for point in &dashboard.trend {
            println!(
                "  {}  {:>2}  {}",
                point.instant.format("%Y-%m-%d %H:%M:%S"),
                point.value,
                trend_axis_label(point.value).unwrap_or_default()
            );
        }
    }
}

fn print_history<'a>(records: impl Iterator<Item = &'a MoodRecord>) {
    println!("{:<20} {:<9} {:>7}  Message", "Timestamp", "Mood", "Score");
    for record in records {
        let score = record
            .compound_score()
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "-".to_string());
        let mood = match record.category() {
            Some(category) => category.as_str().to_string(),
            None => format!("?{}", record.mood().unwrap_or_default()),
        };
        println!(
            "{:<20} {:<9} {:>7}  {}",
            record.timestamp().unwrap_or("-"),
            mood,
            score,
            record.message().unwrap_or_default()
        );
    }
}

// =============================================================================
// FILTER COMMAND
// =============================================================================

/// Print records whose message contains the keyword.
pub async fn cmd_filter(config: &Config, json_mode: bool, keyword: &str) -> Result<(), CliError> {
    let keyword = Keyword::new(keyword)?;
    let store = load_store(config).await?;
    let view = store.filter(&keyword);

    if json_mode {
        let records: Vec<&MoodRecord> = view.records().to_vec();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No entries mention '{}'.", keyword.as_str());
        return Ok(());
    }
    println!("{} entries mention '{}':", view.len(), keyword.as_str());
    println!();
    print_history(view.records().iter().copied());
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the CSV export to `output`.
pub async fn cmd_export(
    config: &Config,
    output: &Path,
    keyword: Option<&str>,
) -> Result<(), CliError> {
    let keyword = keyword
        .filter(|k| !k.trim().is_empty())
        .map(Keyword::new)
        .transpose()?;
    let output = validate_output_path(output)?;
    let store = load_store(config).await?;

    let export = match &keyword {
        Some(keyword) => export_csv(store.filter(keyword).records().iter().copied())?,
        None => store.export()?,
    };

    std::fs::write(&output, export.content.as_bytes())?;
    tracing::info!("Exported {} records to {}", export.row_count, output.display());
    println!("Exported {} records to {}", export.row_count, output.display());
    Ok(())
}

// =============================================================================
// SUBMIT COMMAND
// =============================================================================

/// Send a message to the backend and print the classification.
pub async fn cmd_submit(config: &Config, json_mode: bool, message: &str) -> Result<(), CliError> {
    let source = HttpLogSource::new(&config.source)?;
    let analysis = source.analyze(message).await?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Mood:     {}", analysis.mood);
    println!("Compound: {:.3}", analysis.scores.compound);
    match MoodCategory::parse(&analysis.mood) {
        Some(category) => {
            let (suggestion, link) = category.suggestion();
            println!();
            println!("Journaling prompt: {}", category.journaling_prompt());
            println!("Suggestion:        {} ({})", suggestion, link);
        }
        None => tracing::warn!("Backend returned unknown mood '{}'", analysis.mood),
    }
    Ok(())
}
