//! # Property-Based Tests
//!
//! Invariants of the aggregation, filter and export paths, checked with proptest.

#![allow(clippy::float_arithmetic)]

use moodlog_core::{
    FilteredView, Keyword, MoodCounts, MoodPercentages, MoodRecord, export_csv, trend_series,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn mood_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("positive".to_string()),
        Just("negative".to_string()),
        Just("neutral".to_string()),
        "[a-z]{1,8}",
    ]
}

fn record() -> impl Strategy<Value = MoodRecord> {
    (
        0u32..86_400,
        "[ -~\n]{0,40}",
        mood_label(),
        -2.0f64..2.0,
    )
        .prop_map(|(secs, message, mood, score)| {
            let timestamp = format!(
                "2025-04-12 {:02}:{:02}:{:02}",
                secs / 3600,
                (secs / 60) % 60,
                secs % 60
            );
            MoodRecord::new(timestamp, message, mood, score)
        })
}

// =============================================================================
// TEST CSV READER
// =============================================================================

/// Minimal RFC 4180 reader: quoted fields, doubled quotes, `\n` rows.
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => in_quotes = false,
            (true, c) => field.push(c),
            (false, '"') => in_quotes = true,
            (false, ',') => row.push(std::mem::take(&mut field)),
            (false, '\n') => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (false, c) => field.push(c),
        }
    }
    row.push(field);
    rows.push(row);
    rows
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Counts never exceed the record count; equal iff every mood is recognized.
    #[test]
    fn counts_bounded_by_length(records in vec(record(), 0..60)) {
        let counts = MoodCounts::from_records(&records);
        prop_assert!(counts.total() <= records.len());
        let all_recognized = records.iter().all(MoodRecord::is_recognized);
        prop_assert_eq!(counts.total() == records.len(), all_recognized);
    }

    /// Percentages add up to 100 within rounding tolerance.
    #[test]
    fn percentages_sum_to_hundred(records in vec(record(), 1..60)) {
        let counts = MoodCounts::from_records(&records);
        prop_assume!(counts.total() > 0);
        let pct = MoodPercentages::from_counts(&counts);
        let sum = pct.positive + pct.negative + pct.neutral;
        prop_assert!((sum - 100.0).abs() <= 0.2, "sum was {}", sum);
        for value in [pct.positive, pct.negative, pct.neutral] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    /// The trend has one point per recognized record.
    #[test]
    fn trend_length_matches_counts(records in vec(record(), 0..60)) {
        let counts = MoodCounts::from_records(&records);
        prop_assert_eq!(trend_series(&records).len(), counts.total());
    }

    /// Filtering twice with the same keyword changes nothing.
    #[test]
    fn filtering_is_idempotent(records in vec(record(), 0..60), word in "[a-zA-Z]{1,3}") {
        let keyword = Keyword::new(word).expect("non-blank keyword");
        let once = FilteredView::new(&records, &keyword);
        let twice = once.refine(&keyword);
        prop_assert_eq!(once.records(), twice.records());
    }

    /// Parsing the export yields the original fields in order.
    #[test]
    fn export_round_trips(records in vec(record(), 1..30)) {
        let export = export_csv(&records).expect("non-empty export");
        let rows = parse_csv(&export.content);

        prop_assert_eq!(rows.len(), records.len() + 1);
        prop_assert_eq!(&rows[0], &vec![
            "timestamp".to_string(),
            "message".to_string(),
            "mood".to_string(),
            "compound_score".to_string(),
        ]);
        for (row, record) in rows[1..].iter().zip(&records) {
            prop_assert_eq!(row[0].as_str(), record.timestamp().unwrap_or_default());
            prop_assert_eq!(row[1].as_str(), record.message().unwrap_or_default());
            prop_assert_eq!(row[2].as_str(), record.mood().unwrap_or_default());
            let score: f64 = row[3].parse().expect("score parses");
            prop_assert_eq!(Some(score), record.compound_score());
        }
    }
}
