//! CLI command definitions and handlers

mod analyze;
mod diff;
mod init;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse a score threshold (0-100)
fn parse_score(s: &str) -> Result<u32, String> {
    let n: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid score", s))?;
    if n > 100 {
        Err("score must be between 0 and 100".to_string())
    } else {
        Ok(n)
    }
}

/// storedoctor - metafield health analysis
///
/// Works on a snapshot file. Nothing is fetched from or written to the store.
#[derive(Parser, Debug)]
#[command(name = "storedoctor")]
#[command(
    version,
    about = "Find broken, unused and duplicated metafields in a store snapshot and score the setup 0-100",
    after_help = "\
Examples:
  storedoctor init                                  Write an example storedoctor.toml
  storedoctor analyze snapshot.json                 Terminal report
  storedoctor analyze snapshot.json -f csv -o issues.csv
  storedoctor analyze snapshot.json --fail-below 70 Exit code 1 below 70 (CI mode)
  storedoctor score report.json --explain           Re-score a saved report
  storedoctor diff last-week.json today.json        What changed between two runs"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers for rule evaluation (1-64)
    #[arg(long, global = true, env = "STOREDOCTOR_WORKERS", value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a storedoctor.toml config file with example settings
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Analyze a snapshot and report metafield issues
    #[command(after_help = "\
Examples:
  storedoctor analyze snapshot.json                      Terminal report
  storedoctor analyze snapshot.json --format json        JSON for scripting (input to score/diff)
  storedoctor analyze snapshot.json -f markdown -o r.md  Markdown report
  storedoctor analyze snapshot.json --skip-rule validation-missing
  storedoctor analyze snapshot.json --explain-score      Show the penalty breakdown")]
    Analyze {
        /// Snapshot JSON file with definitions, products and collections
        snapshot: PathBuf,

        /// Output format: text, json, csv, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "csv", "markdown", "md"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Config file (default: storedoctor.toml or .storedoctorrc.json next to the snapshot)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip a rule by name (repeatable)
        #[arg(long = "skip-rule")]
        skip_rule: Vec<String>,

        /// Exit with code 1 when the score is below this value
        #[arg(long, value_parser = parse_score)]
        fail_below: Option<u32>,

        /// Show the scoring breakdown
        #[arg(long)]
        explain_score: bool,
    },

    /// Score a saved issue list or JSON report
    Score {
        /// JSON file holding an issue array or an analyze --format json report
        issues: PathBuf,

        /// Config file for penalty overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show the scoring breakdown
        #[arg(long)]
        explain: bool,
    },

    /// Compare two JSON reports
    Diff {
        /// Earlier report (analyze --format json)
        baseline: PathBuf,

        /// Later report
        current: PathBuf,

        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),

        Commands::Analyze {
            snapshot,
            format,
            output,
            config,
            skip_rule,
            fail_below,
            explain_score,
        } => analyze::run(analyze::AnalyzeOptions {
            snapshot,
            format,
            output,
            config,
            skip_rules: skip_rule,
            fail_below,
            explain_score,
            workers: cli.workers,
        }),

        Commands::Score {
            issues,
            config,
            explain,
        } => score::run(&issues, config.as_deref(), explain),

        Commands::Diff {
            baseline,
            current,
            format,
        } => diff::run(&baseline, &current, &format),
    }
}
