//! # Engine Primitives
//!
//! Fixed constants for the mood-log engine: wire formats, export layout
//! and input limits. Compiled in and immutable at runtime.

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Naive timestamp layouts accepted after RFC 3339 fails, interpreted as UTC.
///
/// The first entry is what the sentiment backend writes
/// (`datetime.now().strftime("%Y-%m-%d %H:%M:%S")`).
pub const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Minute-precision ISO 8601 layouts with an offset (`Z`, `+02`, `+02:00`),
/// which RFC 3339 parsing rejects for lacking seconds.
pub const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

// =============================================================================
// EXPORT LAYOUT
// =============================================================================

/// Column order of the CSV export. Also the header row.
pub const CSV_COLUMNS: [&str; 4] = ["timestamp", "message", "mood", "compound_score"];

/// Row separator of the CSV export.
pub const CSV_LINE_SEPARATOR: &str = "\n";

/// Filename suggested to whoever writes the export to disk.
pub const DEFAULT_EXPORT_FILENAME: &str = "mood_log.csv";
