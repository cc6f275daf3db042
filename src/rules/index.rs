//! Shared lookups over the catalog and resource values
//!
//! Membership sets are keyed by composite `namespace.key` strings. Counters
//! that feed issue output keep first-insertion order so rule output follows
//! input encounter order.

use crate::models::{
    FieldDefinition, FieldInstance, IssueRecord, IssueType, ResourceType, ResourceValue,
};
use crate::rules::base::AnalysisInput;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Iterate every field instance on the given resources
pub fn field_instances(resources: &[ResourceValue]) -> impl Iterator<Item = &FieldInstance> + '_ {
    resources.iter().flat_map(|resource| resource.fields.iter())
}

/// Composite keys declared by the catalog
pub fn defined_keys(definitions: &[FieldDefinition]) -> FxHashSet<String> {
    definitions.iter().map(FieldDefinition::composite_key).collect()
}

/// Composite keys present on any field instance, set or not
pub fn observed_keys(input: &AnalysisInput<'_>) -> FxHashSet<String> {
    field_instances(input.products)
        .chain(field_instances(input.collections))
        .map(FieldInstance::composite_key)
        .collect()
}

/// Composite keys with at least one non-empty value
pub fn used_keys(input: &AnalysisInput<'_>) -> FxHashSet<String> {
    field_instances(input.products)
        .chain(field_instances(input.collections))
        .filter(|field| !field.is_empty())
        .map(FieldInstance::composite_key)
        .collect()
}

/// Per `(namespace, key, resource type)` counts in first-seen order
#[derive(Debug, Default)]
pub struct OccurrenceCounter {
    counts: IndexMap<(String, String, ResourceType), u32>,
}

impl OccurrenceCounter {
    /// Count the field instances across both collections that match `predicate`
    pub fn count_matching(
        input: &AnalysisInput<'_>,
        predicate: impl Fn(&FieldInstance) -> bool,
    ) -> Self {
        let mut counter = Self::default();
        for (resources, resource_type) in input.resource_collections() {
            for field in field_instances(resources).filter(|field| predicate(*field)) {
                counter.record(field, resource_type);
            }
        }
        counter
    }

    pub fn record(&mut self, field: &FieldInstance, resource_type: ResourceType) {
        *self
            .counts
            .entry((field.namespace.clone(), field.key.clone(), resource_type))
            .or_insert(0) += 1;
    }

    /// One issue per counted triple, occurrences set to its count
    pub fn into_issues(self, issue_type: IssueType) -> Vec<IssueRecord> {
        self.counts
            .into_iter()
            .map(|((namespace, key, resource_type), count)| {
                IssueRecord::new(namespace, key, resource_type, issue_type).with_occurrences(count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tests::{field, product};

    #[test]
    fn test_observed_and_used_keys_differ_on_empty_values() {
        let products = vec![
            product("p1", vec![field("custom", "color", ""), field("custom", "size", "M")]),
        ];
        let collections = vec![product("c1", vec![field("seo", "title", "Sale")])];
        let input = AnalysisInput::new(&[], &products, &collections);

        let observed = observed_keys(&input);
        assert_eq!(observed.len(), 3);
        assert!(observed.contains("custom.color"));

        let used = used_keys(&input);
        assert_eq!(used.len(), 2);
        assert!(!used.contains("custom.color"));
        assert!(used.contains("seo.title"));
    }

    #[test]
    fn test_counter_keeps_first_seen_order_and_splits_resource_types() {
        let products = vec![
            product("p1", vec![field("b", "two", ""), field("a", "one", "")]),
            product("p2", vec![field("a", "one", "")]),
        ];
        let collections = vec![product("c1", vec![field("b", "two", "")])];
        let input = AnalysisInput::new(&[], &products, &collections);

        let issues = OccurrenceCounter::count_matching(&input, |f| f.is_empty())
            .into_issues(IssueType::EmptyMetafield);
        assert_eq!(issues.len(), 3);
        let shape: Vec<_> = issues
            .iter()
            .map(|i| (i.namespace.as_str(), i.resource_type, i.occurrences))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("b", ResourceType::Product, 1),
                ("a", ResourceType::Product, 2),
                ("b", ResourceType::Collection, 1),
            ]
        );
    }
}
