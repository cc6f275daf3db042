//! Configuration module for storedoctor
//!
//! This module handles:
//! - Project-level configuration (storedoctor.toml)
//! - Rule enable/disable and threshold overrides
//! - Scoring customization
//! - CLI defaults

mod project_config;

pub use project_config::{
    CliDefaults,
    ProjectConfig,
    RuleConfigOverride,
    ScoringConfig,
    ThresholdsConfig,
    CONFIG_FILE_NAMES,
    load_config_file,
    load_project_config,
    normalize_rule_name,
};
