//! Metafield detection rules
//!
//! This module provides the rule framework and the eight rules that find
//! structural and data-quality problems in a store's metafield setup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Analyzer                             │
//! │  - Validates namespace/key identity of the input            │
//! │  - Runs rules sequentially or on a rayon pool               │
//! │  - Concatenates issues in registration order                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Rule Trait                           │
//! │  - name(): kebab-case identifier used by config             │
//! │  - issue_type(): the one issue type it emits                │
//! │  - detect(input): pure function over the borrowed input     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Rules
//!
//! ## Catalog rules (definitions only)
//! - `DuplicateNamespaceRule` - namespace reused across owner types
//! - `ValidationMissingRule` - definition without validation rules
//!
//! ## Reconciliation rules (definitions against values)
//! - `DefinitionWithoutValuesRule` - definition never observed on a resource
//! - `ValueWithoutDefinitionRule` - value stored under an undeclared key
//! - `UnusedMetafieldRule` - definition never given a non-empty value
//!
//! ## Value rules (field instances only)
//! - `EmptyMetafieldRule` - null or empty values
//! - `LongTextValueRule` - values over the long-text threshold
//! - `SeoDuplicateRule` - one value repeated across many products
//!
//! # Usage
//!
//! ```ignore
//! use storedoctor::rules::{Analyzer, EmptyMetafieldRule};
//! use std::sync::Arc;
//!
//! let analyzer = Analyzer::builder()
//!     .workers(4)
//!     .rule(Arc::new(EmptyMetafieldRule::new()))
//!     .build();
//!
//! let issues = analyzer.analyze(&definitions, &products, &collections)?;
//! ```

mod base;
mod engine;
pub mod index;

mod definition_without_values;
mod duplicate_namespace;
mod empty_metafield;
mod long_text_value;
mod seo_duplicate;
mod unused_metafield;
mod validation_missing;
mod value_without_definition;

pub use base::{AnalysisError, AnalysisInput, AnalysisResult, AnalysisStats, Rule, RuleResult};
pub use engine::{Analyzer, AnalyzerBuilder};

pub use definition_without_values::DefinitionWithoutValuesRule;
pub use duplicate_namespace::{DuplicateNamespaceRule, NAMESPACE_WILDCARD};
pub use empty_metafield::EmptyMetafieldRule;
pub use long_text_value::{LongTextValueRule, LONG_TEXT_THRESHOLD};
pub use seo_duplicate::{SeoDuplicateRule, SEO_DUPLICATE_THRESHOLD};
pub use unused_metafield::UnusedMetafieldRule;
pub use validation_missing::ValidationMissingRule;
pub use value_without_definition::ValueWithoutDefinitionRule;

use crate::config::ProjectConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tunable thresholds for the threshold-based rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleThresholds {
    /// UTF-8 byte length above which a value is "long"
    pub long_text: usize,
    /// Repeat count at which a product value is an SEO duplicate
    pub seo_duplicate: u32,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            long_text: LONG_TEXT_THRESHOLD,
            seo_duplicate: SEO_DUPLICATE_THRESHOLD,
        }
    }
}

/// The full rule set, in reporting order
pub fn default_rules(thresholds: &RuleThresholds) -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(DuplicateNamespaceRule::new()),
        Arc::new(DefinitionWithoutValuesRule::new()),
        Arc::new(ValueWithoutDefinitionRule::new()),
        Arc::new(EmptyMetafieldRule::new()),
        Arc::new(UnusedMetafieldRule::new()),
        Arc::new(LongTextValueRule::with_threshold(thresholds.long_text)),
        Arc::new(SeoDuplicateRule::with_threshold(thresholds.seo_duplicate)),
        Arc::new(ValidationMissingRule::new()),
    ]
}

/// Names of every rule in the default set
pub fn rule_names() -> Vec<&'static str> {
    default_rules(&RuleThresholds::default())
        .iter()
        .map(|rule| rule.name())
        .collect()
}

/// Skip names that match no rule once normalized
pub fn unknown_rule_names<'a>(names: &'a [String]) -> Vec<&'a str> {
    let known = rule_names();
    names
        .iter()
        .filter(|name| {
            let normalized = crate::config::normalize_rule_name(name);
            !known.iter().any(|rule| *rule == normalized)
        })
        .map(String::as_str)
        .collect()
}

/// The default rule set with project thresholds applied, minus rules the
/// config disables or the caller asks to skip
pub fn configured_rules(config: &ProjectConfig, skip: &[String]) -> Vec<Arc<dyn Rule>> {
    for name in unknown_rule_names(skip)
        .into_iter()
        .chain(unknown_rule_names(&config.defaults.skip_rules))
    {
        warn!(
            "Unknown rule '{}' in skip list (known rules: {})",
            name,
            rule_names().join(", ")
        );
    }

    let skip: Vec<String> = skip
        .iter()
        .map(|name| crate::config::normalize_rule_name(name))
        .collect();

    default_rules(&config.rule_thresholds())
        .into_iter()
        .filter(|rule| {
            let name = rule.name();
            if !config.is_rule_enabled(name) {
                debug!("Rule {} disabled by project config", name);
                return false;
            }
            if skip.iter().any(|s| s == name) {
                debug!("Rule {} skipped on request", name);
                return false;
            }
            true
        })
        .collect()
}
