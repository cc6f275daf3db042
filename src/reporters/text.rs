//! Text (terminal) reporter with colors and formatting

use crate::models::{AnalysisReport, IssueDetails, IssueRecord, QualityLabel};
use anyhow::Result;

/// Label colors (ANSI escape codes)
fn label_color(label: QualityLabel) -> &'static str {
    match label {
        QualityLabel::Good => "\x1b[32m", // Green
        QualityLabel::Fair => "\x1b[33m", // Yellow
        QualityLabel::Poor => "\x1b[31m", // Red
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Issues listed before the "...and N more" line
const MAX_LISTED_ISSUES: usize = 15;

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let summary = &report.summary;

    // Header
    let label_c = label_color(summary.quality_label);
    out.push_str(&format!("\n{BOLD}StoreDoctor Metafield Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Quality: {label_c}{BOLD}{}{RESET}  ",
        summary.quality_score, summary.quality_label
    ));
    out.push_str(&format!(
        "Definitions: {}  Metafields: {}  Issues: {}\n\n",
        summary.total_definitions, summary.total_metafields, summary.total_issues
    ));

    if report.issues.is_empty() {
        out.push_str("No issues found.\n");
        return Ok(out);
    }

    // Occurrences by issue type
    out.push_str(&format!("{BOLD}BY ISSUE TYPE{RESET}\n"));
    for (issue_type, occurrences) in &summary.issues_by_type {
        out.push_str(&format!("  {:<28} {:>6}\n", issue_type.title(), occurrences));
    }
    out.push('\n');

    out.push_str(&format!("{BOLD}BY RESOURCE TYPE{RESET}\n"));
    for (resource_type, tally) in &summary.issues_by_resource_type {
        out.push_str(&format!(
            "  {:<12} {:>4} issues  {:>6} occurrences\n",
            resource_type.as_str(),
            tally.issue_count,
            tally.total_occurrences
        ));
    }
    out.push('\n');

    // Issue table
    out.push_str(&format!(
        "{DIM}  #   TYPE                      RESOURCE    FIELD                          COUNT{RESET}\n"
    ));
    out.push_str(&format!(
        "{DIM}  ─────────────────────────────────────────────────────────────────────────────{RESET}\n"
    ));

    for (i, issue) in report.issues.iter().take(MAX_LISTED_ISSUES).enumerate() {
        out.push_str(&format!(
            "  {DIM}{:>3}{RESET}  {:<25} {:<11} {:<30} {:>5}\n",
            i + 1,
            issue.issue_type.as_str(),
            issue.resource_type.as_str(),
            truncate(&format!("{}.{}", issue.namespace, issue.key), 30),
            issue.occurrences
        ));
        if let Some(note) = detail_note(issue) {
            out.push_str(&format!("       {DIM}{}{RESET}\n", note));
        }
    }

    let remaining = report.issues.len().saturating_sub(MAX_LISTED_ISSUES);
    if remaining > 0 {
        out.push_str(&format!(
            "\n  {DIM}...and {} more (use --format csv for the full list){RESET}\n",
            remaining
        ));
    }
    out.push('\n');

    Ok(out)
}

fn detail_note(issue: &IssueRecord) -> Option<String> {
    match issue.details.as_ref()? {
        IssueDetails::OwnerTypes { owner_types } => {
            Some(format!("owner types: {}", owner_types.join(", ")))
        }
        IssueDetails::DuplicateValue { duplicate_value } => {
            Some(format!("repeated value: \"{}\"", truncate(duplicate_value, 60)))
        }
    }
}

/// Truncate on char boundaries, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
