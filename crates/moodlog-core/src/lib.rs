//! # moodlog-core
//!
//! The mood-log aggregation and presentation engine - THE ENGINE.
//!
//! Given the log produced by an external sentiment-analysis service, this
//! crate derives what a mood dashboard renders:
//! - per-category counts and a percentage distribution
//! - a signed mood-over-time series
//! - a summary label
//! - keyword-filtered subsets
//! - a CSV export
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never re-sorts: producer order is display order
//! - Treats its input as untrusted: a bad record is downgraded, a bad body
//!   is rejected, nothing panics
//! - The `MoodStore` is written only through its refresh lifecycle; the
//!   caller owns it and decides who may drive a refresh

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod ingestor;
pub mod primitives;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    FailureKind, FieldDefect, MoodCategory, MoodError, MoodRecord, RecordShapeWarning,
    RefreshFailure, SummaryLabel, SyncState, parse_timestamp,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use aggregate::{
    Aggregation, MoodCounts, MoodPercentages, TrendPoint, sort_chronologically, trend_axis_label,
    trend_series,
};
pub use dashboard::Dashboard;
pub use export::{CsvExport, export_csv};
pub use filter::{FilteredView, Keyword};
pub use ingestor::{IngestReport, Ingestor};
pub use store::MoodStore;
