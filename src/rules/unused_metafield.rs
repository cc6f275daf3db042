//! Unused Metafield Rule
//!
//! Flags definitions that no resource assigns a non-empty value to. Unlike
//! `DefinitionWithoutValuesRule`, a key that only ever appears with empty
//! values still counts as unused.

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::used_keys;

#[derive(Debug, Default)]
pub struct UnusedMetafieldRule;

impl UnusedMetafieldRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UnusedMetafieldRule {
    fn name(&self) -> &'static str {
        "unused-metafield"
    }

    fn description(&self) -> &'static str {
        "Detects definitions with zero non-empty assignments"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::UnusedMetafield
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        let used = used_keys(input);

        input
            .definitions
            .iter()
            .filter(|def| !used.contains(&def.composite_key()))
            .map(|def| {
                IssueRecord::new(
                    &def.namespace,
                    &def.key,
                    def.resource_type(),
                    IssueType::UnusedMetafield,
                )
            })
            .collect()
    }
}
