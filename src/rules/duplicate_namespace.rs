//! Duplicate Namespace Rule
//!
//! A namespace should belong to one conceptual domain. Definitions that share
//! a namespace across owner types (e.g. `custom` on both products and
//! collections) usually mean a namespace got reused by accident.
//!
//! Owner types are compared in their canonical uppercase spelling, which is
//! also what `details.owner_types` reports.

use crate::models::{IssueDetails, IssueRecord, IssueType, OwnerType, ResourceType};
use crate::rules::base::{AnalysisInput, Rule};
use indexmap::{IndexMap, IndexSet};

/// Key reported for namespace-wide issues
pub const NAMESPACE_WILDCARD: &str = "*";

#[derive(Debug, Default)]
pub struct DuplicateNamespaceRule;

impl DuplicateNamespaceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DuplicateNamespaceRule {
    fn name(&self) -> &'static str {
        "duplicate-namespace"
    }

    fn description(&self) -> &'static str {
        "Detects namespaces whose definitions span more than one owner type"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::DuplicateNamespace
    }

    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
        let mut owners_by_namespace: IndexMap<&str, IndexSet<&OwnerType>> = IndexMap::new();
        for def in input.definitions {
            owners_by_namespace
                .entry(def.namespace.as_str())
                .or_default()
                .insert(&def.owner_type);
        }

        owners_by_namespace
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(namespace, owners)| {
                IssueRecord::new(
                    namespace,
                    NAMESPACE_WILDCARD,
                    ResourceType::Global,
                    IssueType::DuplicateNamespace,
                )
                .with_occurrences(owners.len() as u32)
                .with_details(IssueDetails::OwnerTypes {
                    owner_types: owners.iter().map(|o| o.as_str().to_string()).collect(),
                })
            })
            .collect()
    }
}
