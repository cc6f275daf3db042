//! Project-level configuration support
//!
//! Loads per-project configuration from `storedoctor.toml` or
//! `.storedoctorrc.json`, looked up in the directory holding the snapshot.
//!
//! # Configuration Format
//!
//! ```toml
//! # storedoctor.toml
//!
//! [rules.validation-missing]
//! enabled = false
//!
//! [thresholds]
//! long_text = 800
//! seo_duplicate = 25
//!
//! [scoring]
//! default_penalty = 2
//! occurrence_bucket = 10
//!
//! [scoring.penalties]
//! duplicate_namespace = 12
//!
//! [defaults]
//! format = "text"
//! fail_below = 60
//! workers = 4
//! ```

use crate::models::IssueType;
use crate::rules::RuleThresholds;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["storedoctor.toml", ".storedoctorrc.json"];

/// Project-level configuration loaded from storedoctor.toml or similar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Per-rule overrides, keyed by rule name
    #[serde(default)]
    pub rules: HashMap<String, RuleConfigOverride>,

    /// Rule threshold overrides
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    /// Scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Configuration override for a specific rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfigOverride {
    /// Whether the rule runs (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// UTF-8 byte length above which a value counts as long text (default: 500)
    #[serde(default)]
    pub long_text: Option<usize>,

    /// Products sharing one value before it is an SEO duplicate (default: 10)
    #[serde(default)]
    pub seo_duplicate: Option<u32>,
}

/// Penalty model for the quality score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Per-issue-type penalty overrides, keyed by snake_case issue type
    #[serde(default)]
    pub penalties: HashMap<String, u32>,

    /// Points for an issue type with no table entry (default: 2)
    #[serde(default = "default_penalty")]
    pub default_penalty: u32,

    /// Occurrences per penalty unit for occurrence-based issues (default: 10)
    #[serde(default = "default_occurrence_bucket")]
    pub occurrence_bucket: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalties: HashMap::new(),
            default_penalty: default_penalty(),
            occurrence_bucket: default_occurrence_bucket(),
        }
    }
}

fn default_penalty() -> u32 {
    2
}

fn default_occurrence_bucket() -> u32 {
    10
}

impl ScoringConfig {
    /// Configured override for an issue type, if any
    pub fn penalty_override(&self, issue_type: IssueType) -> Option<u32> {
        self.penalties.get(issue_type.as_str()).copied()
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliDefaults {
    /// Default output format (text, json, csv, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Exit non-zero when the score is below this value
    #[serde(default)]
    pub fail_below: Option<u32>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Skip rules by default
    #[serde(default)]
    pub skip_rules: Vec<String>,
}

/// Load project configuration from a directory.
///
/// Searches for `storedoctor.toml`, then `.storedoctorrc.json`. Returns the
/// default configuration if neither exists or both fail to parse.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from an explicit file; JSON by extension, TOML otherwise
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let config: ProjectConfig = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?
    };

    Ok(config)
}

impl ProjectConfig {
    /// Check if a rule is enabled (defaults to true if not specified)
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        let normalized = normalize_rule_name(name);

        if self
            .defaults
            .skip_rules
            .iter()
            .any(|skip| normalize_rule_name(skip) == normalized)
        {
            return false;
        }

        self.rules
            .iter()
            .find(|(key, _)| normalize_rule_name(key) == normalized)
            .and_then(|(_, c)| c.enabled)
            .unwrap_or(true)
    }

    /// Rule thresholds with project overrides applied
    pub fn rule_thresholds(&self) -> RuleThresholds {
        let defaults = RuleThresholds::default();
        RuleThresholds {
            long_text: self.thresholds.long_text.unwrap_or(defaults.long_text),
            seo_duplicate: self.thresholds.seo_duplicate.unwrap_or(defaults.seo_duplicate),
        }
    }
}

/// Normalize rule name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_rule_name(name: &str) -> String {
    // EmptyMetafieldRule -> empty-metafield
    // SEODuplicateRule -> seo-duplicate
    // empty_metafield -> empty-metafield

    let mut result = String::new();
    let chars: Vec<char> = name.trim().chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if *c == '_' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    result.trim_end_matches("-rule").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_rule_name() {
        assert_eq!(normalize_rule_name("EmptyMetafieldRule"), "empty-metafield");
        assert_eq!(normalize_rule_name("SEODuplicateRule"), "seo-duplicate");
        assert_eq!(normalize_rule_name("empty_metafield"), "empty-metafield");
        assert_eq!(normalize_rule_name("empty-metafield"), "empty-metafield");
        assert_eq!(normalize_rule_name("ValidationMissing"), "validation-missing");
    }

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();

        assert!(config.is_rule_enabled("empty-metafield"));
        assert!(config.is_rule_enabled("unknown-rule"));

        assert_eq!(config.scoring.default_penalty, 2);
        assert_eq!(config.scoring.occurrence_bucket, 10);
        assert_eq!(config.rule_thresholds(), RuleThresholds::default());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[rules.validation-missing]
enabled = false

[rules.seo_duplicate]
enabled = true

[thresholds]
long_text = 800

[scoring]
default_penalty = 4

[scoring.penalties]
duplicate_namespace = 12

[defaults]
format = "json"
fail_below = 60
workers = 4
skip_rules = ["LongTextValueRule"]
"#;

        let config: ProjectConfig = toml::from_str(toml_content).expect("parse project config");

        assert!(!config.is_rule_enabled("validation-missing"));
        assert!(!config.is_rule_enabled("ValidationMissingRule"));
        assert!(config.is_rule_enabled("seo-duplicate"));
        assert!(!config.is_rule_enabled("long-text-value"));

        let thresholds = config.rule_thresholds();
        assert_eq!(thresholds.long_text, 800);
        assert_eq!(thresholds.seo_duplicate, 10);

        assert_eq!(config.scoring.default_penalty, 4);
        assert_eq!(config.scoring.occurrence_bucket, 10);
        assert_eq!(
            config.scoring.penalty_override(IssueType::DuplicateNamespace),
            Some(12)
        );
        assert_eq!(config.scoring.penalty_override(IssueType::SeoDuplicate), None);

        assert_eq!(config.defaults.format.as_deref(), Some("json"));
        assert_eq!(config.defaults.fail_below, Some(60));
        assert_eq!(config.defaults.workers, Some(4));
    }

    #[test]
    fn test_load_prefers_toml_over_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("storedoctor.toml"),
            "[thresholds]\nseo_duplicate = 3\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(".storedoctorrc.json"),
            r#"{"thresholds": {"seo_duplicate": 7}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.rule_thresholds().seo_duplicate, 3);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("storedoctor.toml"), "[thresholds\nbroken").unwrap();
        std::fs::write(
            dir.path().join(".storedoctorrc.json"),
            r#"{"rules": {"empty-metafield": {"enabled": false}}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert!(!config.is_rule_enabled("empty-metafield"));
    }

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_project_config(dir.path());
        assert!(config.rules.is_empty());
        assert!(config.defaults.format.is_none());
    }

    #[test]
    fn test_load_config_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "thresholds = 5").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid TOML"));

        let missing = load_config_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read config file"));
    }
}
