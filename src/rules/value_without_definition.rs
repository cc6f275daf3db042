//! Value Without Definition Rule
//!
//! Flags composite keys stored on products or collections that the catalog
//! never declares. Each undefined key is reported once, attributed to the
//! collection it was first seen in. Shop- and variant-level values are not
//! scanned.

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::{defined_keys, field_instances};
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct ValueWithoutDefinitionRule;

impl ValueWithoutDefinitionRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ValueWithoutDefinitionRule {
    fn name(&self) -> &'static str {
        "value-without-definition"
    }

    fn description(&self) -> &'static str {
        "Detects metafield values that have no matching definition"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::ValueWithoutDefinition
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        let defined = defined_keys(input.definitions);
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut issues = Vec::new();

        for (resources, resource_type) in input.resource_collections() {
            for field in field_instances(resources) {
                let key = field.composite_key();
                if defined.contains(&key) || !seen.insert(key) {
                    continue;
                }
                issues.push(IssueRecord::new(
                    &field.namespace,
                    &field.key,
                    resource_type,
                    IssueType::ValueWithoutDefinition,
                ));
            }
        }

        issues
    }
}
