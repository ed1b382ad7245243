//! # Ingestor Module
//!
//! Validation of a fetched mood log before it reaches the store.
//!
//! - The body must be a JSON array, otherwise the whole fetch is malformed
//! - Each element is read field by field; unknown fields are ignored
//! - A bad element is downgraded and reported, never dropped
//! - Producer order is preserved

use crate::{FieldDefect, MoodError, MoodRecord, RecordShapeWarning};
use serde_json::Value;

/// Outcome of ingesting one fetched log.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Every element of the log, in producer order.
    pub records: Vec<MoodRecord>,
    /// Per-record notes for downgraded elements.
    pub warnings: Vec<RecordShapeWarning>,
}

impl IngestReport {
    /// Number of records that were downgraded to the unrecognized category.
    #[must_use]
    pub fn downgraded_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_recognized()).count()
    }
}

/// The Ingestor turns an untrusted response body into records.
pub struct Ingestor;

impl Ingestor {
    /// Parse a raw response body.
    ///
    /// Returns `MoodError::MalformedResponse` if the body is not JSON or is
    /// not an array. Array length is not limited.
    pub fn parse_log(body: &[u8]) -> Result<IngestReport, MoodError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| MoodError::MalformedResponse(format!("body is not valid JSON: {e}")))?;
        Self::ingest_value(&value)
    }

    /// Ingest an already-decoded JSON document.
    pub fn ingest_value(value: &Value) -> Result<IngestReport, MoodError> {
        let Value::Array(elements) = value else {
            return Err(MoodError::MalformedResponse(format!(
                "expected an array of records, got {}",
                json_kind(value)
            )));
        };

        let mut report = IngestReport {
            records: Vec::with_capacity(elements.len()),
            warnings: Vec::new(),
        };

        for (index, element) in elements.iter().enumerate() {
            let (record, defects) = match element {
                Value::Object(_) => {
                    let record = Self::record_from_object(element);
                    let defects = record.defects();
                    (record, defects)
                }
                _ => (MoodRecord::empty(), vec![FieldDefect::NotAnObject]),
            };
            report.warnings.extend(
                defects
                    .into_iter()
                    .map(|defect| RecordShapeWarning { index, defect }),
            );
            report.records.push(record);
        }

        Ok(report)
    }

    /// Read the four known fields of one object. Wrong types count as missing.
    fn record_from_object(object: &Value) -> MoodRecord {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
        MoodRecord::from_fields(
            text("timestamp"),
            text("message"),
            text("mood"),
            object.get("compound_score").and_then(Value::as_f64),
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// TESTS
// =============================================================================
