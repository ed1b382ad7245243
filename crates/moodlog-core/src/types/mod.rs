//! # Core Type Definitions
//!
//! This module contains the data model of the mood-log engine:
//! - Mood categories (`MoodCategory`, `SummaryLabel`)
//! - The record itself (`MoodRecord`) and its shape defects (`FieldDefect`)
//! - Refresh lifecycle vocabulary (`SyncState`, `RefreshFailure`)
//! - Error types (`MoodError`)
//!
//! ## Untrusted Records
//!
//! A `MoodRecord` always keeps every field exactly as the producer sent it,
//! so filtering and export see the raw values. Whether the record takes part
//! in counting and trend charting is decided once, at construction, and
//! exposed through [`MoodRecord::category`].

use crate::primitives::{OFFSET_TIMESTAMP_FORMATS, TIMESTAMP_FORMATS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// MOOD CATEGORY
// =============================================================================

/// One of the three moods the sentiment service classifies into.
///
/// Anything else on the wire is "unrecognized" and never becomes a
/// `MoodCategory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodCategory {
    Positive,
    Negative,
    Neutral,
}

impl MoodCategory {
    /// Chart order used by the bar and pie series.
    pub const ALL: [MoodCategory; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Parse a wire label. Matching is exact: `"Positive"` is unrecognized.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Wire label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Capitalized label for chart legends.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }

    /// Value plotted on the trend chart: `1`, `0` or `-1`.
    #[must_use]
    pub const fn signed_value(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }

    /// Inverse of [`signed_value`](Self::signed_value), used for trend axis ticks.
    #[must_use]
    pub const fn from_signed(value: i8) -> Option<Self> {
        match value {
            1 => Some(Self::Positive),
            0 => Some(Self::Neutral),
            -1 => Some(Self::Negative),
            _ => None,
        }
    }

    /// Journaling prompt offered after a submission is classified.
    #[must_use]
    pub fn journaling_prompt(&self) -> &'static str {
        match self {
            Self::Positive => "What made you feel good today?",
            Self::Negative => "What's bothering you, and how can you work through it?",
            Self::Neutral => "Reflect on one thing you're grateful for.",
        }
    }

    /// Music or meditation suggestion paired with the prompt.
    #[must_use]
    pub fn suggestion(&self) -> (&'static str, &'static str) {
        match self {
            Self::Positive => (
                "Listen to something joyful!",
                "https://www.youtube.com/watch?v=JgDNFQ2RaLQ",
            ),
            Self::Negative => (
                "Try this relaxing meditation.",
                "https://www.youtube.com/watch?v=5jca-sWgemI",
            ),
            Self::Neutral => (
                "Lo-fi beats to relax or focus",
                "https://www.youtube.com/watch?v=mZQH8CPQ-wo",
            ),
        }
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SUMMARY LABEL
// =============================================================================

/// Headline verdict over a record set. Only positive and negative counts
/// are compared; neutral never tips the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLabel {
    MostlyPositive,
    MostlyNegative,
    Mixed,
}

impl SummaryLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MostlyPositive => "mostly_positive",
            Self::MostlyNegative => "mostly_negative",
            Self::Mixed => "mixed",
        }
    }

    /// Human-readable headline.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::MostlyPositive => "Mostly Positive",
            Self::MostlyNegative => "Mostly Negative",
            Self::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for SummaryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FIELD DEFECTS
// =============================================================================

/// Why a record was downgraded to the unrecognized category.
///
/// A field that is present with the wrong JSON type is reported as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "defect", content = "detail", rename_all = "snake_case")]
pub enum FieldDefect {
    /// The array element was not a JSON object at all.
    NotAnObject,
    MissingTimestamp,
    /// The timestamp string matched none of the accepted formats.
    InvalidTimestamp(String),
    MissingMessage,
    MissingMood,
    /// The mood label is not one of `positive`, `negative`, `neutral`.
    UnrecognizedMood(String),
    MissingScore,
}

impl std::fmt::Display for FieldDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("record is not an object"),
            Self::MissingTimestamp => f.write_str("missing timestamp"),
            Self::InvalidTimestamp(raw) => write!(f, "unparseable timestamp '{raw}'"),
            Self::MissingMessage => f.write_str("missing message"),
            Self::MissingMood => f.write_str("missing mood"),
            Self::UnrecognizedMood(raw) => write!(f, "unrecognized mood '{raw}'"),
            Self::MissingScore => f.write_str("missing compound_score"),
        }
    }
}

/// A non-fatal note about a single record in a fetched log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordShapeWarning {
    /// Position of the record in the fetched sequence.
    pub index: usize,
    pub defect: FieldDefect,
}

impl std::fmt::Display for RecordShapeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record #{}: {}", self.index, self.defect)
    }
}

// =============================================================================
// MOOD RECORD
// =============================================================================

/// One timestamped, classified sentiment observation.
///
/// Raw fields are kept verbatim (all optional, since the source is
/// untrusted). `instant` and `category` are derived once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodRecord {
    timestamp: Option<String>,
    message: Option<String>,
    mood: Option<String>,
    compound_score: Option<f64>,
    #[serde(skip)]
    instant: Option<DateTime<Utc>>,
    #[serde(skip)]
    category: Option<MoodCategory>,
}

impl MoodRecord {
    /// Build a fully-populated record.
    #[must_use]
    pub fn new(
        timestamp: impl Into<String>,
        message: impl Into<String>,
        mood: impl Into<String>,
        compound_score: f64,
    ) -> Self {
        Self::from_fields(
            Some(timestamp.into()),
            Some(message.into()),
            Some(mood.into()),
            Some(compound_score),
        )
    }

    /// Build a record from possibly-missing wire fields.
    ///
    /// The record is recognized only when every field is present, the
    /// timestamp parses and the mood is a known label.
    #[must_use]
    pub fn from_fields(
        timestamp: Option<String>,
        message: Option<String>,
        mood: Option<String>,
        compound_score: Option<f64>,
    ) -> Self {
        let instant = timestamp.as_deref().and_then(parse_timestamp);
        let category = match (instant, &message, compound_score) {
            (Some(_), Some(_), Some(_)) => mood.as_deref().and_then(MoodCategory::parse),
            _ => None,
        };
        Self {
            timestamp,
            message,
            mood,
            compound_score,
            instant,
            category,
        }
    }

    /// A placeholder for an array element that was not an object.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_fields(None, None, None, None)
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Raw mood label as sent by the producer.
    #[must_use]
    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    #[must_use]
    pub fn compound_score(&self) -> Option<f64> {
        self.compound_score
    }

    /// Parsed timestamp, if it was present and well-formed.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// The category this record counts toward, or `None` if unrecognized.
    #[must_use]
    pub fn category(&self) -> Option<MoodCategory> {
        self.category
    }

    /// Whether the record takes part in counts, percentages and trend.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.category.is_some()
    }

    /// Row tone for the history table: positive and negative by label,
    /// everything else shaded neutral.
    #[must_use]
    pub fn display_tone(&self) -> MoodCategory {
        match self.mood.as_deref() {
            Some("positive") => MoodCategory::Positive,
            Some("negative") => MoodCategory::Negative,
            _ => MoodCategory::Neutral,
        }
    }

    /// Every reason this record is not recognized. Empty for a recognized record.
    #[must_use]
    pub fn defects(&self) -> Vec<FieldDefect> {
        let mut defects = Vec::new();
        match (&self.timestamp, self.instant) {
            (None, _) => defects.push(FieldDefect::MissingTimestamp),
            (Some(raw), None) => defects.push(FieldDefect::InvalidTimestamp(raw.clone())),
            (Some(_), Some(_)) => {}
        }
        if self.message.is_none() {
            defects.push(FieldDefect::MissingMessage);
        }
        match &self.mood {
            None => defects.push(FieldDefect::MissingMood),
            Some(raw) if MoodCategory::parse(raw).is_none() => {
                defects.push(FieldDefect::UnrecognizedMood(raw.clone()));
            }
            Some(_) => {}
        }
        if self.compound_score.is_none() {
            defects.push(FieldDefect::MissingScore);
        }
        defects
    }
}

/// Parse a producer timestamp into a UTC instant.
///
/// Accepts RFC 3339, the minute-precision offset forms in
/// [`OFFSET_TIMESTAMP_FORMATS`], and the naive forms listed in
/// [`TIMESTAMP_FORMATS`] (interpreted as UTC). A bare date maps to midnight.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// =============================================================================
// REFRESH LIFECYCLE
// =============================================================================

/// Lifecycle of the store with respect to the external log source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// No refresh has been attempted yet.
    #[default]
    Uninitialized,
    /// A refresh is in flight.
    Loading,
    /// The last refresh succeeded.
    Ready,
    /// Data from an earlier refresh is shown, but the latest attempt failed.
    Stale,
    /// No refresh has ever succeeded and the latest attempt failed.
    Failed,
}

impl SyncState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Stale => "stale",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of the error taxonomy aborted a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport failure or non-success status.
    Fetch,
    /// The body was not an ordered record collection.
    MalformedResponse,
}

/// The error flag raised alongside stale (or absent) data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshFailure {
    pub kind: FailureKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl RefreshFailure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the engine.
///
/// - No silent failures
/// - Per-record problems are [`RecordShapeWarning`]s, never errors
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoodError {
    /// The fetched body is not an ordered collection of records.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Export was requested on zero records.
    #[error("Nothing to export: the record set is empty")]
    EmptyExport,

    /// A refresh was requested while another one is still loading.
    #[error("A refresh is already in progress")]
    RefreshInProgress,

    /// A filter keyword was blank or too long.
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),
}

// =============================================================================
// TESTS
// =============================================================================
