//! storedoctor - metafield health analysis for commerce stores
//!
//! Reconciles a store's metafield definitions with the values stored on its
//! products and collections, classifies structural and data-quality problems,
//! and reduces them to a single 0-100 quality score.
//!
//! ```ignore
//! use storedoctor::{models::Snapshot, rules::Analyzer, scoring::calculate_score};
//!
//! let snapshot = Snapshot::from_json(&std::fs::read_to_string("snapshot.json")?)?;
//! let issues = Analyzer::default().analyze(
//!     &snapshot.definitions,
//!     &snapshot.products,
//!     &snapshot.collections,
//! )?;
//! let score = calculate_score(&issues);
//! ```

pub mod config;
pub mod models;
pub mod reporters;
pub mod rules;
pub mod scoring;

use config::ProjectConfig;
use models::{AnalysisReport, Snapshot};
use rules::{AnalysisError, AnalysisInput, Analyzer};
use scoring::QualityScorer;

/// Run the configured rule set over a snapshot and score the result.
///
/// `skip_rules` disables rules on top of whatever the config disables.
pub fn run_analysis(
    snapshot: &Snapshot,
    config: &ProjectConfig,
    skip_rules: &[String],
    workers: usize,
) -> Result<AnalysisReport, AnalysisError> {
    let input = AnalysisInput::from_snapshot(snapshot);
    let analyzer = Analyzer::from_config(config, skip_rules)
        .workers(workers)
        .build();

    let issues = analyzer.analyze_input(&input)?;
    let score = QualityScorer::new(&config.scoring).calculate(&issues);

    Ok(AnalysisReport::new(
        input.definitions.len(),
        input.total_field_instances(),
        issues,
        score,
    ))
}
