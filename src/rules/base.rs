//! Base rule trait and types
//!
//! This module defines the core abstractions for metafield analysis:
//! - `Rule` trait that all detection rules implement
//! - `AnalysisInput`, the borrowed view of one run's data
//! - `RuleResult` and `AnalysisStats` for capturing execution results

use crate::models::{FieldDefinition, IssueRecord, IssueType, ResourceType, ResourceValue, Snapshot};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while running the analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{location} has an empty {field}")]
    MissingIdentity {
        location: String,
        field: &'static str,
    },

    #[error("Failed to build rule thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Borrowed view of the catalog and both resource collections
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub definitions: &'a [FieldDefinition],
    pub products: &'a [ResourceValue],
    pub collections: &'a [ResourceValue],
}

impl<'a> AnalysisInput<'a> {
    pub fn new(
        definitions: &'a [FieldDefinition],
        products: &'a [ResourceValue],
        collections: &'a [ResourceValue],
    ) -> Self {
        Self {
            definitions,
            products,
            collections,
        }
    }

    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self::new(&snapshot.definitions, &snapshot.products, &snapshot.collections)
    }

    /// Both resource collections, products first, tagged with their resource type
    pub fn resource_collections(&self) -> [(&'a [ResourceValue], ResourceType); 2] {
        [
            (self.products, ResourceType::Product),
            (self.collections, ResourceType::Collection),
        ]
    }

    /// Number of field instances across products and collections
    pub fn total_field_instances(&self) -> usize {
        self.products
            .iter()
            .chain(self.collections)
            .map(|resource| resource.fields.len())
            .sum()
    }

    /// Reject definitions and field instances without a namespace or key
    pub fn validate(&self) -> AnalysisResult<()> {
        for (i, def) in self.definitions.iter().enumerate() {
            check_identity(&def.namespace, &def.key, || format!("Definition #{i}"))?;
        }

        for (resources, resource_type) in self.resource_collections() {
            for resource in resources {
                for (i, field) in resource.fields.iter().enumerate() {
                    check_identity(&field.namespace, &field.key, || {
                        format!("Field #{i} on {resource_type} {}", resource.id)
                    })?;
                }
            }
        }

        Ok(())
    }
}

fn check_identity(
    namespace: &str,
    key: &str,
    location: impl Fn() -> String,
) -> AnalysisResult<()> {
    if namespace.is_empty() {
        return Err(AnalysisError::MissingIdentity {
            location: location(),
            field: "namespace",
        });
    }
    if key.is_empty() {
        return Err(AnalysisError::MissingIdentity {
            location: location(),
            field: "key",
        });
    }
    Ok(())
}

/// Trait for all metafield detection rules
///
/// Rules are pure functions over the input: they hold only their own
/// thresholds and never see each other's output, so any subset can run in
/// any order or in parallel.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyRule;
///
/// impl Rule for MyRule {
///     fn name(&self) -> &'static str {
///         "my-rule"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific metafield problem"
///     }
///
///     fn issue_type(&self) -> IssueType {
///         IssueType::EmptyMetafield
///     }
///
///     fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord> {
///         vec![]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique kebab-case identifier, used for config lookups
    fn name(&self) -> &'static str;

    /// Human-readable description of what this rule finds
    fn description(&self) -> &'static str;

    /// The one issue type this rule emits
    fn issue_type(&self) -> IssueType;

    /// Run detection and return issues in input encounter order
    fn detect(&self, input: &AnalysisInput<'_>) -> Vec<IssueRecord>;
}

/// Result from running a single rule
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub rule_name: String,
    pub issues: Vec<IssueRecord>,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}

impl RuleResult {
    pub fn new(rule_name: impl Into<String>, issues: Vec<IssueRecord>, duration_ms: u64) -> Self {
        Self {
            rule_name: rule_name.into(),
            issues,
            duration_ms,
        }
    }
}

/// Summary statistics from running a rule set
#[derive(Debug, Clone, Default)]
pub struct AnalysisStats {
    pub rules_run: usize,
    pub total_issues: usize,
    pub by_type: HashMap<IssueType, usize>,
    /// Total execution time in milliseconds
    pub total_duration_ms: u64,
}

impl AnalysisStats {
    /// Update stats with a rule result
    pub fn add_result(&mut self, result: &RuleResult) {
        self.rules_run += 1;
        self.total_issues += result.issues.len();
        self.total_duration_ms += result.duration_ms;

        for issue in &result.issues {
            *self.by_type.entry(issue.issue_type).or_insert(0) += 1;
        }
    }
}
