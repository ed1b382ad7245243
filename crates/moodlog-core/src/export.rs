//! # CSV Export Module
//!
//! Serializes records to a self-contained CSV payload.
//!
//! Layout:
//! - Header `timestamp,message,mood,compound_score`, unquoted, emitted once
//! - Every data field double-quoted, embedded `"` doubled
//! - Missing fields become `""`
//! - Rows in input order, separated by `\n`
//!
//! The exporter performs no I/O. An empty input is refused with
//! `MoodError::EmptyExport` instead of producing a header-only file.

use crate::primitives::{CSV_COLUMNS, CSV_LINE_SEPARATOR};
use crate::{MoodError, MoodRecord};

/// A serialized export ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// The UTF-8 CSV text.
    pub content: String,
    /// Number of data rows (header excluded).
    pub row_count: usize,
}

impl CsvExport {
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
}

/// Export a sequence of records (a full store or a filtered view).
pub fn export_csv<'a, I>(records: I) -> Result<CsvExport, MoodError>
where
    I: IntoIterator<Item = &'a MoodRecord>,
{
    let mut lines = vec![CSV_COLUMNS.join(",")];
    lines.extend(records.into_iter().map(csv_row));

    let row_count = lines.len() - 1;
    if row_count == 0 {
        return Err(MoodError::EmptyExport);
    }

    Ok(CsvExport {
        content: lines.join(CSV_LINE_SEPARATOR),
        row_count,
    })
}

fn csv_row(record: &MoodRecord) -> String {
    let score = record.compound_score().map(format_score);
    [
        record.timestamp(),
        record.message(),
        record.mood(),
        score.as_deref(),
    ]
    .map(quote_field)
    .join(",")
}

/// Stringify a score the way it is shown in the history table.
///
/// Uses the shortest representation that round-trips, so `0.8` stays
/// `0.8` and `0.0` becomes `0`.
#[must_use]
pub fn format_score(score: f64) -> String {
    format!("{score}")
}

/// Quote one field, doubling embedded quotes. `None` becomes `""`.
#[must_use]
pub fn quote_field(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or_default().replace('"', "\"\""))
}

// =============================================================================
// TESTS
// =============================================================================
