//! # Dashboard Snapshot
//!
//! The presentation-facing bundle recomputed after every store replacement.

use crate::aggregate::{Aggregation, MoodCounts, MoodPercentages, TrendPoint};
use crate::{MoodRecord, SummaryLabel};
use serde::{Deserialize, Serialize};

/// Everything a dashboard renders, derived from one record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// All records, recognized or not.
    pub total_records: usize,
    /// Records excluded from counts, percentages and trend.
    pub unrecognized_records: usize,
    pub counts: MoodCounts,
    pub percentages: MoodPercentages,
    pub summary: SummaryLabel,
    pub trend: Vec<TrendPoint>,
}

impl Dashboard {
    #[must_use]
    pub fn from_records(records: &[MoodRecord]) -> Self {
        let Aggregation {
            counts,
            trend,
            percentages,
            summary,
        } = Aggregation::compute(records);
        Self {
            total_records: records.len(),
            unrecognized_records: records.len().saturating_sub(counts.total()),
            counts,
            percentages,
            summary,
            trend,
        }
    }
}
