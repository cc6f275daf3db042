//! CSV reporter
//!
//! One row per issue. Every cell is double-quoted with embedded quotes
//! doubled, and rows are joined with `\n`.

use crate::models::{AnalysisReport, IssueRecord};
use anyhow::Result;

pub const CSV_HEADER: &str = "Namespace,Key,Resource Type,Issue Type,Occurrences";

/// Quote a cell, doubling any embedded quotes
pub fn escape_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render_row(issue: &IssueRecord) -> String {
    let occurrences = issue.occurrences.to_string();
    [
        issue.namespace.as_str(),
        issue.key.as_str(),
        issue.resource_type.as_str(),
        issue.issue_type.as_str(),
        occurrences.as_str(),
    ]
    .iter()
    .map(|cell| escape_cell(cell))
    .collect::<Vec<_>>()
    .join(",")
}

/// Render the report's issues as CSV
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut rows = Vec::with_capacity(report.issues.len() + 1);
    rows.push(CSV_HEADER.to_string());
    rows.extend(report.issues.iter().map(render_row));
    Ok(rows.join("\n"))
}
