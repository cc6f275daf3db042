//! Empty Metafield Rule
//!
//! Counts field instances whose value is null or the empty string, one issue
//! per namespace, key and resource type.

use crate::models::{IssueRecord, IssueType};
use crate::rules::base::{AnalysisInput, Rule};
use crate::rules::index::OccurrenceCounter;

#[derive(Debug, Default)]
pub struct EmptyMetafieldRule;

impl EmptyMetafieldRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for EmptyMetafieldRule {
    fn name(&self) -> &'static str {
        "empty-metafield"
    }

    fn description(&self) -> &'static str {
        "Detects metafields stored with a null or empty value"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::EmptyMetafield
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        OccurrenceCounter::count_matching(input, |field| field.is_empty())
            .into_issues(IssueType::EmptyMetafield)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldInstance, ResourceType};
    use crate::rules::tests::{field, product};

    #[test]
    fn test_empty_values_are_counted_per_key() {
        let products = vec![
            product("gid://1", vec![field("custom", "color", "")]),
            product("gid://2", vec![field("custom", "color", "")]),
        ];

        let issues = EmptyMetafieldRule::new().detect(&AnalysisInput::new(&[], &products, &[]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].occurrences, 2);
        assert_eq!(issues[0].resource_type, ResourceType::Product);
    }

    #[test]
    fn test_null_and_empty_string_count_together() {
        let products = vec![product(
            "gid://1",
            vec![FieldInstance::unset("custom", "color"), field("custom", "color", "")],
        )];

        let issues = EmptyMetafieldRule::new().detect(&AnalysisInput::new(&[], &products, &[]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].occurrences, 2);
    }

    #[test]
    fn test_products_and_collections_are_reported_separately() {
        let products = vec![product("gid://1", vec![field("custom", "color", "")])];
        let collections = vec![product("gid://c/1", vec![field("custom", "color", "")])];

        let issues = EmptyMetafieldRule::new().detect(&AnalysisInput::new(&[], &products, &collections));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].resource_type, ResourceType::Product);
        assert_eq!(issues[1].resource_type, ResourceType::Collection);
    }

    #[test]
    fn test_whitespace_is_a_value() {
        let products = vec![product("gid://1", vec![field("custom", "color", " ")])];
        let issues = EmptyMetafieldRule::new().detect(&AnalysisInput::new(&[], &products, &[]));
        assert!(issues.is_empty());
    }
}
