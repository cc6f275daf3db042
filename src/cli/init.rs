//! Init command - write an example project config

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub(crate) const EXAMPLE_CONFIG: &str = r#"# storedoctor configuration
#
# Every setting is optional; remove what you don't need.

# Disable a rule (names: duplicate-namespace, definition-without-values,
# value-without-definition, empty-metafield, unused-metafield,
# long-text-value, seo-duplicate, validation-missing)
# [rules.validation-missing]
# enabled = false

[thresholds]
# Values longer than this many bytes (UTF-8) are flagged
long_text = 500

# A product value repeated on at least this many products is flagged
seo_duplicate = 10

[scoring]
# Points for issue types without an entry in the penalty table
default_penalty = 2

# Occurrences per penalty unit for empty_metafield and long_text_value
occurrence_bucket = 10

# Per-type penalty overrides
# [scoring.penalties]
# duplicate_namespace = 10
# value_without_definition = 8

[defaults]
# Output format (text, json, csv, markdown)
format = "text"

# Exit with code 1 below this score
# fail_below = 60

# Rule evaluation threads
# workers = 4
"#;

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    let config_path = path.join("storedoctor.toml");
    if config_path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nNext: {}",
        style("storedoctor analyze snapshot.json").yellow()
    );

    Ok(())
}
