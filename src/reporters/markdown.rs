//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments on theme or catalog repos
//! - Scheduled audit issues
//! - Documentation

use crate::models::{AnalysisReport, IssueDetails, IssueRecord, IssueType, QualityLabel};
use anyhow::Result;

/// Maximum issues to show per issue type
const MAX_ISSUES_PER_TYPE: usize = 10;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str(&render_resource_types(report));
    md.push('\n');

    md.push_str(&render_detailed_issues(report));

    Ok(md)
}

fn render_header(report: &AnalysisReport) -> String {
    let badge = match report.summary.quality_label {
        QualityLabel::Good => "🟢",
        QualityLabel::Fair => "🟡",
        QualityLabel::Poor => "🔴",
    };

    format!(
        "# {} Metafield Health Report\n\n**Quality: {}** | **Score: {}/100**\n",
        badge, report.summary.quality_label, report.summary.quality_score
    )
}

fn render_summary(report: &AnalysisReport) -> String {
    let s = &report.summary;
    let mut out = format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| **Definitions** | {} |
| **Metafields** | {} |
| **Issues** | {} |
"#,
        s.total_definitions, s.total_metafields, s.total_issues
    );

    if !s.issues_by_type.is_empty() {
        out.push_str("\n| Issue type | Occurrences |\n|------------|-------------|\n");
        for (issue_type, occurrences) in &s.issues_by_type {
            out.push_str(&format!("| {} | {} |\n", issue_type.title(), occurrences));
        }
    }

    out
}

fn render_resource_types(report: &AnalysisReport) -> String {
    let by_resource = &report.summary.issues_by_resource_type;
    if by_resource.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "## By Resource Type\n\n| Resource | Issues | Occurrences |\n|----------|--------|-------------|\n",
    );
    for (resource_type, tally) in by_resource {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            resource_type, tally.issue_count, tally.total_occurrences
        ));
    }
    out
}

fn render_detailed_issues(report: &AnalysisReport) -> String {
    if report.issues.is_empty() {
        return "## Issues\n\nNo issues found. ✨\n".to_string();
    }

    let mut out = String::from("## Issues\n");

    let all_types = IssueType::ALL
        .into_iter()
        .chain(std::iter::once(IssueType::Unknown));
    for issue_type in all_types {
        let issues: Vec<&IssueRecord> = report
            .issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .collect();
        if issues.is_empty() {
            continue;
        }

        out.push_str(&format!("\n### {} ({})\n\n", issue_type.title(), issues.len()));
        out.push_str("| Field | Resource | Occurrences | Details |\n");
        out.push_str("|-------|----------|-------------|---------|\n");
        for issue in issues.iter().take(MAX_ISSUES_PER_TYPE) {
            out.push_str(&format!(
                "| `{}.{}` | {} | {} | {} |\n",
                table_text(&issue.namespace),
                table_text(&issue.key),
                issue.resource_type,
                issue.occurrences,
                details_cell(issue)
            ));
        }
        if issues.len() > MAX_ISSUES_PER_TYPE {
            out.push_str(&format!(
                "\n*...and {} more*\n",
                issues.len() - MAX_ISSUES_PER_TYPE
            ));
        }
    }

    out
}

/// Keep user text inside one table cell: escape pipes, flatten line breaks
fn table_text(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

fn details_cell(issue: &IssueRecord) -> String {
    match &issue.details {
        Some(IssueDetails::OwnerTypes { owner_types }) => table_text(&owner_types.join(", ")),
        Some(IssueDetails::DuplicateValue { duplicate_value }) => {
            format!("\"{}\"", table_text(duplicate_value))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceType;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_markdown_sections() {
        let md = render(&test_report()).unwrap();
        assert!(md.starts_with("# 🟢 Metafield Health Report"));
        assert!(md.contains("**Score: 80/100**"));
        assert!(md.contains("| **Definitions** | 4 |"));
        assert!(md.contains("## By Resource Type"));
        assert!(md.contains("### Namespace spans owner types (1)"));
        assert!(md.contains("| `custom.*` | global | 2 | PRODUCT, COLLECTION |"));
    }

    #[test]
    fn test_markdown_clean_report() {
        let md = render(&AnalysisReport::new(1, 1, vec![], 100)).unwrap();
        assert!(md.contains("No issues found."));
        assert!(!md.contains("## By Resource Type"));
    }

    #[test]
    fn test_markdown_caps_issues_per_type() {
        let issues: Vec<_> = (0..13)
            .map(|i| {
                IssueRecord::new("ns", format!("k{i}"), ResourceType::Product, IssueType::UnusedMetafield)
            })
            .collect();
        let md = render(&AnalysisReport::new(13, 0, issues, 35)).unwrap();
        assert!(md.contains("### Unused metafield (13)"));
        assert!(md.contains("*...and 3 more*"));
        assert!(md.starts_with("# 🔴"));
    }

    #[test]
    fn test_markdown_escapes_pipes_in_values() {
        let issues = vec![IssueRecord::new("seo", "title", ResourceType::Product, IssueType::SeoDuplicate)
            .with_occurrences(10)
            .with_details(IssueDetails::DuplicateValue {
                duplicate_value: "A | B".into(),
            })];
        let md = render(&AnalysisReport::new(0, 10, issues, 93)).unwrap();
        assert!(md.contains("\"A \\| B\""));
    }

    #[test]
    fn test_markdown_keeps_multiline_values_in_one_row() {
        let issues = vec![
            IssueRecord::new("seo", "description", ResourceType::Product, IssueType::SeoDuplicate)
                .with_occurrences(10)
                .with_details(IssueDetails::DuplicateValue {
                    duplicate_value: "Line one\nLine two\r\nLine three".into(),
                }),
            IssueRecord::new("odd|ns", "k\ney", ResourceType::Product, IssueType::UnusedMetafield),
        ];
        let md = render(&AnalysisReport::new(1, 10, issues, 88)).unwrap();

        assert!(md.contains(
            "| `seo.description` | product | 10 | \"Line one Line two Line three\" |\n"
        ));
        assert!(md.contains("| `odd\\|ns.k ey` | product | 1 |  |\n"));
    }
}
