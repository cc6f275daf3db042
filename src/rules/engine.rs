//! Rule execution engine
//!
//! Runs a rule set over one input. With more than one worker the rules are
//! evaluated on a dedicated rayon pool; results are always collected in
//! registration order, so parallel and sequential runs produce the same list.

use crate::config::ProjectConfig;
use crate::models::{FieldDefinition, IssueRecord, ResourceValue};
use crate::rules::base::{AnalysisInput, AnalysisResult, AnalysisStats, Rule, RuleResult};
use crate::rules::{configured_rules, default_rules, RuleThresholds};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs the rule set and concatenates the issues it finds
pub struct Analyzer {
    rules: Vec<Arc<dyn Rule>>,
    workers: usize,
}

impl Analyzer {
    /// Analyzer over the given rules, run sequentially
    pub fn new(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules, workers: 1 }
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Builder preloaded with the rule set a project config selects
    pub fn from_config(config: &ProjectConfig, skip_rules: &[String]) -> AnalyzerBuilder {
        AnalyzerBuilder::new().rules(configured_rules(config, skip_rules))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule and concatenate their issues in rule order
    ///
    /// Fails only when a definition or field instance has an empty
    /// namespace or key.
    pub fn analyze(
        &self,
        definitions: &[FieldDefinition],
        products: &[ResourceValue],
        collections: &[ResourceValue],
    ) -> AnalysisResult<Vec<IssueRecord>> {
        self.analyze_input(&AnalysisInput::new(definitions, products, collections))
    }

    pub fn analyze_input(&self, input: &AnalysisInput<'_>) -> AnalysisResult<Vec<IssueRecord>> {
        let (results, stats) = self.run_detailed(input)?;

        info!(
            "Analysis complete: {} issues from {} rules in {}ms",
            stats.total_issues, stats.rules_run, stats.total_duration_ms
        );

        Ok(results.into_iter().flat_map(|result| result.issues).collect())
    }

    /// Run every rule and return per-rule results
    pub fn run_detailed(
        &self,
        input: &AnalysisInput<'_>,
    ) -> AnalysisResult<(Vec<RuleResult>, AnalysisStats)> {
        input.validate()?;

        let start = Instant::now();
        debug!(
            "Running {} rules over {} definitions and {} field instances",
            self.rules.len(),
            input.definitions.len(),
            input.total_field_instances()
        );

        let results: Vec<RuleResult> = if self.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()?;

            pool.install(|| {
                self.rules
                    .par_iter()
                    .map(|rule| run_single_rule(rule, input))
                    .collect()
            })
        } else {
            self.rules
                .iter()
                .map(|rule| run_single_rule(rule, input))
                .collect()
        };

        let mut stats = AnalysisStats::default();
        for result in &results {
            stats.add_result(result);
        }
        stats.total_duration_ms = start.elapsed().as_millis() as u64;

        Ok((results, stats))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(default_rules(&RuleThresholds::default()))
    }
}

fn run_single_rule(rule: &Arc<dyn Rule>, input: &AnalysisInput<'_>) -> RuleResult {
    let name = rule.name();
    let start = Instant::now();

    let issues = rule.detect(input);
    let duration = start.elapsed().as_millis() as u64;

    debug!("Rule {} found {} issues in {}ms", name, issues.len(), duration);

    RuleResult::new(name, issues, duration)
}

/// Builder for Analyzer with fluent API
pub struct AnalyzerBuilder {
    workers: usize,
    rules: Vec<Arc<dyn Rule>>,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            workers: 1,
            rules: Vec::new(),
        }
    }

    /// Set number of worker threads (0 and 1 both mean sequential)
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Add a rule
    pub fn rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add multiple rules
    pub fn rules(mut self, rules: impl IntoIterator<Item = Arc<dyn Rule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn build(self) -> Analyzer {
        Analyzer {
            rules: self.rules,
            workers: self.workers,
        }
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
