//! Metafield Quality Scoring
//!
//! Reduces an issue list to a single 0-100 quality score.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = max(0, 100 - sum(penalty(issue)))
//!
//! penalty(issue) = points                              (most types)
//!                = ceil(occurrences / 10) × points     (empty_metafield, long_text_value)
//! ```
//!
//! # Penalty Points
//!
//! - duplicate_namespace: 10
//! - value_without_definition: 8
//! - seo_duplicate: 7
//! - unused_metafield, definition_without_values: 5
//! - validation_missing: 3
//! - empty_metafield, long_text_value: 1 per 10 occurrences
//! - anything else: 2 (configurable)
//!
//! # Example
//!
//! One namespace spread over two owner types plus 25 empty values:
//! 100 - 10 - ceil(25 / 10) × 1 = 87, labelled Good (>= 80).

mod quality_scorer;

pub use quality_scorer::{
    base_penalty, calculate_score, QualityScorer, ScoreBreakdown, TypePenalty, MAX_SCORE,
};
