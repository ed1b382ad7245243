//! # Aggregate Module
//!
//! Pure derivations over an ordered record sequence:
//! - per-category counts
//! - the signed trend series
//! - the rounded percentage distribution
//! - the summary label
//!
//! Nothing here caches or sorts. Unrecognized records are skipped by every
//! function in this module.

use crate::{MoodCategory, MoodRecord, SummaryLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// COUNTS
// =============================================================================

/// Number of recognized records per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoodCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl MoodCounts {
    /// Count the recognized records of a sequence.
    #[must_use]
    pub fn from_records(records: &[MoodRecord]) -> Self {
        let mut counts = Self::default();
        for category in records.iter().filter_map(MoodRecord::category) {
            counts.increment(category);
        }
        counts
    }

    fn increment(&mut self, category: MoodCategory) {
        let slot = match category {
            MoodCategory::Positive => &mut self.positive,
            MoodCategory::Negative => &mut self.negative,
            MoodCategory::Neutral => &mut self.neutral,
        };
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub fn get(&self, category: MoodCategory) -> usize {
        match category {
            MoodCategory::Positive => self.positive,
            MoodCategory::Negative => self.negative,
            MoodCategory::Neutral => self.neutral,
        }
    }

    /// Sum of the three categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.positive
            .saturating_add(self.negative)
            .saturating_add(self.neutral)
    }

    /// Positive vs negative verdict; neutral is not compared.
    #[must_use]
    pub fn summary_label(&self) -> SummaryLabel {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => SummaryLabel::MostlyPositive,
            std::cmp::Ordering::Less => SummaryLabel::MostlyNegative,
            std::cmp::Ordering::Equal => SummaryLabel::Mixed,
        }
    }

    /// Bar chart series in legend order.
    #[must_use]
    pub fn bar_series(&self) -> [(&'static str, usize); 3] {
        MoodCategory::ALL.map(|c| (c.display_name(), self.get(c)))
    }
}

// =============================================================================
// PERCENTAGES
// =============================================================================

/// Share of each category in percent, rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoodPercentages {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl MoodPercentages {
    /// Distribution of the given counts. All zeros when there is nothing to divide.
    #[must_use]
    pub fn from_counts(counts: &MoodCounts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self::default();
        }
        Self {
            positive: percent_of(counts.positive, total),
            negative: percent_of(counts.negative, total),
            neutral: percent_of(counts.neutral, total),
        }
    }

    #[must_use]
    pub fn get(&self, category: MoodCategory) -> f64 {
        match category {
            MoodCategory::Positive => self.positive,
            MoodCategory::Negative => self.negative,
            MoodCategory::Neutral => self.neutral,
        }
    }

    /// Pie chart series in legend order.
    #[must_use]
    pub fn pie_series(&self) -> [(&'static str, f64); 3] {
        MoodCategory::ALL.map(|c| (c.display_name(), self.get(c)))
    }
}

/// `100 * part / total`, rounded to tenths. `total` must be non-zero.
#[allow(clippy::float_arithmetic)]
fn percent_of(part: usize, total: usize) -> f64 {
    let tenths = (part as f64 * 1000.0 / total as f64).round();
    tenths / 10.0
}

// =============================================================================
// TREND SERIES
// =============================================================================

/// One point of the mood-over-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub instant: DateTime<Utc>,
    /// `1` positive, `0` neutral, `-1` negative.
    pub value: i8,
}

/// Trend points for every recognized record, in input order.
#[must_use]
pub fn trend_series(records: &[MoodRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .filter_map(|record| {
            let category = record.category()?;
            let instant = record.instant()?;
            Some(TrendPoint {
                instant,
                value: category.signed_value(),
            })
        })
        .collect()
}

/// Stable chronological sort for callers that want a time-ordered chart.
pub fn sort_chronologically(points: &mut [TrendPoint]) {
    points.sort_by_key(|p| p.instant);
}

/// Y-axis tick label for a trend value.
#[must_use]
pub fn trend_axis_label(value: i8) -> Option<&'static str> {
    MoodCategory::from_signed(value).map(|c| c.display_name())
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// Everything the dashboard charts consume, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub counts: MoodCounts,
    pub trend: Vec<TrendPoint>,
    pub percentages: MoodPercentages,
    pub summary: SummaryLabel,
}

impl Aggregation {
    /// Aggregate a record sequence.
    #[must_use]
    pub fn compute(records: &[MoodRecord]) -> Self {
        let counts = MoodCounts::from_records(records);
        Self {
            counts,
            trend: trend_series(records),
            percentages: MoodPercentages::from_counts(&counts),
            summary: counts.summary_label(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
