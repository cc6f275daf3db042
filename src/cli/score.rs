//! Score command - score a saved issue list without re-running the rules

use anyhow::{Context, Result};
use console::style;
use serde::Deserialize;
use std::path::Path;
use storedoctor::config::{load_config_file, ProjectConfig};
use storedoctor::models::{IssueRecord, IssueType, QualityLabel};
use storedoctor::scoring::QualityScorer;
use tracing::warn;

/// Accepted input shapes: a bare issue array or a JSON report
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IssueSource {
    List(Vec<IssueRecord>),
    Report { issues: Vec<IssueRecord> },
}

impl IssueSource {
    fn into_issues(self) -> Vec<IssueRecord> {
        match self {
            IssueSource::List(issues) => issues,
            IssueSource::Report { issues } => issues,
        }
    }
}

pub(crate) fn parse_issues(content: &str) -> Result<Vec<IssueRecord>> {
    let source: IssueSource = serde_json::from_str(content)
        .context("Expected a JSON array of issues or a report with an \"issues\" field")?;
    Ok(source.into_issues())
}

pub fn run(path: &Path, config: Option<&Path>, explain: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let issues = parse_issues(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let unknown = issues
        .iter()
        .filter(|i| i.issue_type == IssueType::Unknown)
        .count();
    if unknown > 0 {
        warn!("{} issues have an unrecognized type; scoring them with the default penalty", unknown);
    }

    let config = match config {
        Some(p) => load_config_file(p)?,
        None => ProjectConfig::default(),
    };
    let scorer = QualityScorer::new(&config.scoring);
    let breakdown = scorer.breakdown(&issues);

    let label = match breakdown.label {
        QualityLabel::Good => style(breakdown.label.to_string()).green(),
        QualityLabel::Fair => style(breakdown.label.to_string()).yellow(),
        QualityLabel::Poor => style(breakdown.label.to_string()).red(),
    };
    println!(
        "Score: {}/100 ({}) from {} issues",
        style(breakdown.score).bold(),
        label,
        issues.len()
    );

    if explain {
        println!("\n{}", scorer.explain(&breakdown));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_issue_list() {
        let json = r#"[{"namespace":"custom","key":"*","resource_type":"global",
            "issue_type":"duplicate_namespace","occurrences":2,"details":{"owner_types":["PRODUCT","SHOP"]}}]"#;
        let issues = parse_issues(json).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::DuplicateNamespace);
    }

    #[test]
    fn test_parse_report_shape() {
        let json = r#"{"summary": {"ignored": true}, "issues": [
            {"namespace":"x","key":"y","resource_type":"product","issue_type":"empty_metafield","occurrences":25}
        ]}"#;
        let issues = parse_issues(json).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].occurrences, 25);
        assert!(issues[0].details.is_none());
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_issues(r#"{"findings": []}"#).is_err());
    }
}
