//! Analyze command - run the rule set over a snapshot file

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use storedoctor::config::{load_config_file, load_project_config, ProjectConfig};
use storedoctor::models::{AnalysisReport, Snapshot};
use storedoctor::reporters::{self, OutputFormat};
use storedoctor::scoring::QualityScorer;
use tracing::{debug, info};

/// Flags of one `analyze` invocation
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub snapshot: PathBuf,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub skip_rules: Vec<String>,
    pub fail_below: Option<u32>,
    pub explain_score: bool,
    pub workers: Option<usize>,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let snapshot = load_snapshot(&options.snapshot)?;
    let config = resolve_config(&options.snapshot, options.config.as_deref())?;

    let format = OutputFormat::from_str(
        options
            .format
            .as_deref()
            .or(config.defaults.format.as_deref())
            .unwrap_or("text"),
    )?;
    let workers = options.workers.or(config.defaults.workers).unwrap_or(1);
    let fail_below = options.fail_below.or(config.defaults.fail_below);

    info!(
        "Analyzing {} definitions, {} products, {} collections",
        snapshot.definitions.len(),
        snapshot.products.len(),
        snapshot.collections.len()
    );

    let report = storedoctor::run_analysis(&snapshot, &config, &options.skip_rules, workers)
        .with_context(|| format!("Failed to analyze {}", options.snapshot.display()))?;

    let rendered = reporters::report_with_format(&report, format)?;
    write_output(&rendered, options.output.as_deref(), format)?;

    if options.explain_score {
        let scorer = QualityScorer::new(&config.scoring);
        let explanation = scorer.explain(&scorer.breakdown(&report.issues));
        // Keep stdout parseable for machine formats
        if matches!(format, OutputFormat::Json | OutputFormat::Csv) && options.output.is_none() {
            eprintln!("\n{}", explanation);
        } else {
            println!("\n{}", explanation);
        }
    }

    check_fail_threshold(fail_below, &report);
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    Snapshot::from_json(&content)
        .with_context(|| format!("Invalid snapshot JSON in {}", path.display()))
}

/// Explicit `--config` must load; otherwise look next to the snapshot
fn resolve_config(snapshot: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    if let Some(path) = explicit {
        debug!("Using config file {}", path.display());
        return load_config_file(path);
    }

    let dir = snapshot
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(load_project_config(dir))
}

fn write_output(rendered: &str, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} {} report written to {}",
                style("✓").green(),
                format,
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Exit with code 1 when the score is under the threshold
fn check_fail_threshold(fail_below: Option<u32>, report: &AnalysisReport) {
    if let Some(threshold) = fail_below {
        if report.score() < threshold {
            eprintln!(
                "Failing: quality score {} is below --fail-below={}",
                report.score(),
                threshold
            );
            std::process::exit(1);
        }
    }
}
