//! Diff command - compare issues between two analysis runs
//!
//! Shows new issues, resolved issues, and the issue/score deltas.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::Path;
use storedoctor::models::{AnalysisReport, IssueRecord};

/// Check if two issues refer to the same logical problem.
///
/// Issues match on namespace, key, resource type and issue type; occurrence
/// counts and details may differ between runs.
fn issues_match(a: &IssueRecord, b: &IssueRecord) -> bool {
    a.identity() == b.identity()
}

/// Result of diffing two reports.
#[derive(Debug, Serialize)]
pub struct DiffResult {
    pub new_issues: Vec<IssueRecord>,
    pub resolved_issues: Vec<IssueRecord>,
    pub issues_before: usize,
    pub issues_after: usize,
    pub score_before: u32,
    pub score_after: u32,
    pub delta_issues: i64,
    pub delta_score: i64,
}

/// Compute the diff between a baseline and a current report.
pub fn diff_reports(baseline: &AnalysisReport, current: &AnalysisReport) -> DiffResult {
    let new_issues: Vec<IssueRecord> = current
        .issues
        .iter()
        .filter(|c| !baseline.issues.iter().any(|b| issues_match(b, c)))
        .cloned()
        .collect();

    let resolved_issues: Vec<IssueRecord> = baseline
        .issues
        .iter()
        .filter(|b| !current.issues.iter().any(|c| issues_match(b, c)))
        .cloned()
        .collect();

    let issues_before = baseline.summary.total_issues;
    let issues_after = current.summary.total_issues;
    let score_before = baseline.score();
    let score_after = current.score();

    DiffResult {
        new_issues,
        resolved_issues,
        issues_before,
        issues_after,
        score_before,
        score_after,
        delta_issues: issues_after as i64 - issues_before as i64,
        delta_score: i64::from(score_after) - i64::from(score_before),
    }
}

fn load_report(path: &Path) -> Result<AnalysisReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| {
        format!(
            "{} is not a JSON report (produce one with analyze --format json)",
            path.display()
        )
    })
}

pub fn run(baseline: &Path, current: &Path, format: &str) -> Result<()> {
    let before = load_report(baseline)?;
    let after = load_report(current)?;
    let result = diff_reports(&before, &after);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print!("{}", format_text(&result)),
    }
    Ok(())
}

fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn format_issue(issue: &IssueRecord) -> String {
    format!(
        "{} {}.{} ({}, {} occurrences)",
        issue.issue_type, issue.namespace, issue.key, issue.resource_type, issue.occurrences
    )
}

pub fn format_text(result: &DiffResult) -> String {
    let mut out = String::new();

    // Fewer issues and a higher score are both improvements
    let score_delta = signed(result.delta_score);
    let score_delta = if result.delta_score > 0 {
        style(score_delta).green()
    } else if result.delta_score < 0 {
        style(score_delta).red()
    } else {
        style(score_delta).dim()
    };
    let issue_delta = signed(result.delta_issues);
    let issue_delta = if result.delta_issues < 0 {
        style(issue_delta).green()
    } else if result.delta_issues > 0 {
        style(issue_delta).red()
    } else {
        style(issue_delta).dim()
    };

    out.push_str(&format!(
        "\nScore:  {} -> {} ({})\n",
        result.score_before, result.score_after, score_delta
    ));
    out.push_str(&format!(
        "Issues: {} -> {} ({})\n\n",
        result.issues_before, result.issues_after, issue_delta
    ));

    if result.new_issues.is_empty() && result.resolved_issues.is_empty() {
        out.push_str("No issue changes.\n");
        return out;
    }

    if !result.new_issues.is_empty() {
        out.push_str(&format!(
            "{} ({})\n",
            style("NEW").red().bold(),
            result.new_issues.len()
        ));
        for issue in &result.new_issues {
            out.push_str(&format!("  + {}\n", format_issue(issue)));
        }
        out.push('\n');
    }

    if !result.resolved_issues.is_empty() {
        out.push_str(&format!(
            "{} ({})\n",
            style("RESOLVED").green().bold(),
            result.resolved_issues.len()
        ));
        for issue in &result.resolved_issues {
            out.push_str(&format!("  - {}\n", format_issue(issue)));
        }
        out.push('\n');
    }

    out
}
