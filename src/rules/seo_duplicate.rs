//! SEO Duplicate Rule
//!
//! Flags product metafields where one value is repeated across too many
//! products (e.g. the same `seo.title` on every product page). Collections
//! are not checked.
//!
//! Values are tallied per composite key in first-seen order. When several
//! values of one key reach the threshold, the first one seen is reported and
//! the key yields a single issue.

use crate::models::{IssueDetails, IssueRecord, IssueType, ResourceType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::field_instances;
use indexmap::IndexMap;

/// A value repeated on at least this many products is flagged
pub const SEO_DUPLICATE_THRESHOLD: u32 = 10;

/// Per-value counts for one composite key; namespace and key come from the
/// first instance seen
struct ValueTally<'a> {
    namespace: &'a str,
    key: &'a str,
    counts: IndexMap<&'a str, u32>,
}

#[derive(Debug)]
pub struct SeoDuplicateRule {
    threshold: u32,
}

impl SeoDuplicateRule {
    pub fn new() -> Self {
        Self::with_threshold(SEO_DUPLICATE_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for SeoDuplicateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SeoDuplicateRule {
    fn name(&self) -> &'static str {
        "seo-duplicate"
    }

    fn description(&self) -> &'static str {
        "Detects product metafield values repeated across many products"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::SeoDuplicate
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        let mut tallies: IndexMap<String, ValueTally<'_>> = IndexMap::new();

        for field in field_instances(input.products) {
            let Some(value) = field.present_value() else {
                continue;
            };
            *tallies
                .entry(field.composite_key())
                .or_insert_with(|| ValueTally {
                    namespace: &field.namespace,
                    key: &field.key,
                    counts: IndexMap::new(),
                })
                .counts
                .entry(value)
                .or_insert(0) += 1;
        }

        tallies
            .into_values()
            .filter_map(|tally| {
                let (value, count) = tally
                    .counts
                    .into_iter()
                    .find(|(_, count)| *count >= self.threshold)?;

                Some(
                    IssueRecord::new(
                        tally.namespace,
                        tally.key,
                        ResourceType::Product,
                        IssueType::SeoDuplicate,
                    )
                    .with_occurrences(count)
                    .with_details(IssueDetails::DuplicateValue {
                        duplicate_value: value.to_string(),
                    }),
                )
            })
            .collect()
    }
}
