//! Validation Missing Rule

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};

#[derive(Debug, Default)]
pub struct ValidationMissingRule;

impl ValidationMissingRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ValidationMissingRule {
    fn name(&self) -> &'static str {
        "validation-missing"
    }

    fn description(&self) -> &'static str {
        "Detects definitions with no validation rules configured"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::ValidationMissing
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        input
            .definitions
            .iter()
            .filter(|def| def.validations.is_empty())
            .map(|def| {
                IssueRecord::new(
                    &def.namespace,
                    &def.key,
                    def.resource_type(),
                    IssueType::ValidationMissing,
                )
            })
            .collect()
    }
}
