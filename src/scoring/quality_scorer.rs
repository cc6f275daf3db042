//! Weighted-penalty quality scorer

use crate::config::ScoringConfig;
use crate::models::{IssueRecord, IssueType, QualityLabel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Score before any penalty is subtracted
pub const MAX_SCORE: u32 = 100;

/// Built-in penalty points per issue type
///
/// For occurrence-based types the points are charged once per bucket of
/// occurrences. `Unknown` has no entry and falls back to the configured
/// default penalty.
pub fn base_penalty(issue_type: IssueType) -> Option<u32> {
    match issue_type {
        IssueType::DuplicateNamespace => Some(10),
        IssueType::ValueWithoutDefinition => Some(8),
        IssueType::SeoDuplicate => Some(7),
        IssueType::UnusedMetafield => Some(5),
        IssueType::DefinitionWithoutValues => Some(5),
        IssueType::ValidationMissing => Some(3),
        IssueType::EmptyMetafield => Some(1),
        IssueType::LongTextValue => Some(1),
        IssueType::Unknown => None,
    }
}

/// Penalty subtotal for one issue type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypePenalty {
    pub issue_type: IssueType,
    pub issue_count: usize,
    pub occurrences: u64,
    pub points_per_unit: u32,
    pub penalty: u64,
}

/// Complete score breakdown for transparency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Final score (0-100)
    pub score: u32,
    pub label: QualityLabel,
    /// Sum of all penalties before clamping
    pub total_penalty: u64,
    /// Per-type subtotals, in issue type order
    pub by_type: Vec<TypePenalty>,
}

pub struct QualityScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> QualityScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Points charged per issue (or per occurrence bucket) of a type
    pub fn points_per_unit(&self, issue_type: IssueType) -> u32 {
        self.config
            .penalty_override(issue_type)
            .or_else(|| base_penalty(issue_type))
            .unwrap_or(self.config.default_penalty)
    }

    /// Penalty one issue contributes to the score
    pub fn issue_penalty(&self, issue: &IssueRecord) -> u64 {
        let points = u64::from(self.points_per_unit(issue.issue_type));
        if issue.issue_type.is_occurrence_based() {
            let bucket = u64::from(self.config.occurrence_bucket.max(1));
            u64::from(issue.occurrences).div_ceil(bucket) * points
        } else {
            points
        }
    }

    /// Score an issue list: 100 minus the summed penalties, floored at 0
    pub fn calculate(&self, issues: &[IssueRecord]) -> u32 {
        let total: u64 = issues.iter().map(|issue| self.issue_penalty(issue)).sum();
        clamp_score(total)
    }

    pub fn breakdown(&self, issues: &[IssueRecord]) -> ScoreBreakdown {
        let mut by_type: BTreeMap<IssueType, TypePenalty> = BTreeMap::new();

        for issue in issues {
            let entry = by_type.entry(issue.issue_type).or_insert_with(|| TypePenalty {
                issue_type: issue.issue_type,
                issue_count: 0,
                occurrences: 0,
                points_per_unit: self.points_per_unit(issue.issue_type),
                penalty: 0,
            });
            entry.issue_count += 1;
            entry.occurrences += u64::from(issue.occurrences);
            entry.penalty += self.issue_penalty(issue);
        }

        let total_penalty = by_type.values().map(|t| t.penalty).sum();
        let score = clamp_score(total_penalty);

        ScoreBreakdown {
            score,
            label: QualityLabel::from_score(score),
            total_penalty,
            by_type: by_type.into_values().collect(),
        }
    }

    /// Generate human-readable explanation of the score
    pub fn explain(&self, breakdown: &ScoreBreakdown) -> String {
        let mut lines = Vec::new();

        lines.push(format!("# Quality Score: {} ({})\n", breakdown.score, breakdown.label));

        lines.push("## Scoring Formula\n".to_string());
        lines.push("```".to_string());
        lines.push("Score   = max(0, 100 - sum(penalties))".to_string());
        lines.push(format!(
            "Penalty = points                                  (per issue)\n        \
             = ceil(occurrences / {}) x points            (empty_metafield, long_text_value)",
            self.config.occurrence_bucket.max(1)
        ));
        lines.push("```\n".to_string());

        if breakdown.by_type.is_empty() {
            lines.push("No issues found.".to_string());
            return lines.join("\n");
        }

        lines.push("## Penalties\n".to_string());
        lines.push("| Issue type | Issues | Occurrences | Points | Penalty |".to_string());
        lines.push("|------------|--------|-------------|--------|---------|".to_string());
        for t in &breakdown.by_type {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                t.issue_type, t.issue_count, t.occurrences, t.points_per_unit, t.penalty
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "Total penalty: {} (score floored at 0)",
            breakdown.total_penalty
        ));

        lines.join("\n")
    }
}

fn clamp_score(total_penalty: u64) -> u32 {
    let remaining = u64::from(MAX_SCORE).saturating_sub(total_penalty);
    // remaining <= 100
    remaining as u32
}

/// Score an issue list with the default penalty table
pub fn calculate_score(issues: &[IssueRecord]) -> u32 {
    QualityScorer::new(&ScoringConfig::default()).calculate(issues)
}
