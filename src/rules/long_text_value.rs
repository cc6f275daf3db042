//! Long Text Value Rule
//!
//! Counts values longer than the threshold (500 by default), one issue per
//! namespace, key and resource type.
//!
//! Length is the UTF-8 byte length, so multibyte text reaches the threshold
//! with fewer characters.

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::OccurrenceCounter;

/// Values strictly longer than this many bytes are flagged
pub const LONG_TEXT_THRESHOLD: usize = 500;

#[derive(Debug)]
pub struct LongTextValueRule {
    threshold: usize,
}

impl LongTextValueRule {
    pub fn new() -> Self {
        Self::with_threshold(LONG_TEXT_THRESHOLD)
    }

    pub fn with_threshold(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for LongTextValueRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LongTextValueRule {
    fn name(&self) -> &'static str {
        "long-text-value"
    }

    fn description(&self) -> &'static str {
        "Detects metafield values exceeding the long-text threshold"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::LongTextValue
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        OccurrenceCounter::count_matching(input, |field| {
            field
                .value
                .as_deref()
                .is_some_and(|value| value.len() > self.threshold)
        })
        .into_issues(IssueType::LongTextValue)
    }
}
