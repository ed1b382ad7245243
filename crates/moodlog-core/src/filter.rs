//! # Filter Module
//!
//! Case-insensitive keyword search over record messages.
//!
//! A blank keyword cannot be turned into a [`Keyword`], so the engine never
//! has to guess whether "nothing typed" means "everything" or "nothing".
//! That choice belongs to the caller.

use crate::{MoodError, MoodRecord};

/// A validated, non-blank search keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    raw: String,
    folded: String,
}

impl Keyword {
    /// Validate a keyword.
    ///
    /// Returns `MoodError::InvalidKeyword` for an empty or whitespace-only
    /// string. Surrounding whitespace inside a non-blank keyword is kept.
    pub fn new(raw: impl Into<String>) -> Result<Self, MoodError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(MoodError::InvalidKeyword(
                "keyword must not be blank".to_string(),
            ));
        }
        let folded = raw.to_lowercase();
        Ok(Self { raw, folded })
    }

    /// The keyword as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a message contains this keyword, ignoring case.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        message.to_lowercase().contains(&self.folded)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A read-only, order-preserving subset of a record sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    keyword: Keyword,
    records: Vec<&'a MoodRecord>,
}

impl<'a> FilteredView<'a> {
    /// Select the records whose message contains `keyword`.
    ///
    /// Records without a message never match.
    #[must_use]
    pub fn new(records: &'a [MoodRecord], keyword: &Keyword) -> Self {
        Self::select(records.iter(), keyword)
    }

    fn select(records: impl Iterator<Item = &'a MoodRecord>, keyword: &Keyword) -> Self {
        Self {
            keyword: keyword.clone(),
            records: records
                .filter(|r| r.message().is_some_and(|m| keyword.matches(m)))
                .collect(),
        }
    }

    /// Narrow this view further.
    #[must_use]
    pub fn refine(&self, keyword: &Keyword) -> Self {
        Self::select(self.records.iter().copied(), keyword)
    }

    /// The keyword this view was last filtered with.
    #[must_use]
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    #[must_use]
    pub fn records(&self) -> &[&'a MoodRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clone the matching records out of the view.
    #[must_use]
    pub fn to_records(&self) -> Vec<MoodRecord> {
        self.records.iter().map(|&r| r.clone()).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
