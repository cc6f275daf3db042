//! Definition Without Values Rule
//!
//! Flags definitions whose composite key never appears on any product or
//! collection, not even with an empty value.

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::observed_keys;

#[derive(Debug, Default)]
pub struct DefinitionWithoutValuesRule;

impl DefinitionWithoutValuesRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DefinitionWithoutValuesRule {
    fn name(&self) -> &'static str {
        "definition-without-values"
    }

    fn description(&self) -> &'static str {
        "Detects definitions that no resource carries a field instance for"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::DefinitionWithoutValues
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        let observed = observed_keys(input);

        input
            .definitions
            .iter()
            .filter(|def| !observed.contains(&def.composite_key()))
            .map(|def| {
                IssueRecord::new(
                    &def.namespace,
                    &def.key,
                    def.resource_type(),
                    IssueType::DefinitionWithoutValues,
                )
            })
            .collect()
    }
}
