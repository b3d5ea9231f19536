//! Aegis Historian CLI - Command Line Interface
//!
//! Command-line driver for the historian rollup engine. Reads samples that a
//! historian has already fetched, runs the requested rollup, and prints the
//! result as JSON.
//!
//! Key Features:
//! - Single point rollups from a JSON sample file
//! - Batch reports from a JSON job list
//! - Effective configuration dump
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::DateTime;
use clap::{Parser, Subcommand};
use historian_common::{EngineConfig, HistorianError, Period, Result, Sample, SignalValue};
use historian_rollup::{ReportJob, ReportRunner, RollupGenerator, RollupKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "historian")]
#[command(author = "AutomataNexus Development Team")]
#[command(version = "0.1.0")]
#[command(about = "Aegis Historian rollup CLI", long_about = None)]
struct Cli {
    /// Engine configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll up the samples of one point over one period
    Rollup {
        /// JSON file holding `start_value` and `samples`
        #[arg(short, long)]
        input: PathBuf,
        /// none, numeric, state_duration or changes
        #[arg(short, long, default_value = "numeric")]
        kind: RollupKind,
        /// Period start, epoch millis or RFC 3339
        #[arg(long)]
        start: String,
        /// Period end (exclusive), epoch millis or RFC 3339
        #[arg(long)]
        end: String,
    },
    /// Run a batch of report jobs from a JSON file
    Report {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

/// Contents of a `rollup` input file.
#[derive(Debug, Deserialize)]
struct RollupInput {
    #[serde(default)]
    start_value: Option<SignalValue>,
    #[serde(default)]
    samples: Vec<Sample>,
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Rollup {
            input,
            kind,
            start,
            end,
        } => {
            let period = Period::new(parse_time(&start)?, parse_time(&end)?)?;
            let input: RollupInput = read_json(&input)?;

            let mut rollup = kind.build(period, input.start_value, &config)?;
            rollup.accept_all(&input.samples)?;
            rollup.finalize();

            print_json(&rollup.summary())
        }
        Commands::Report { input } => {
            let jobs: Vec<ReportJob> = read_json(&input)?;
            let rows = ReportRunner::new(config)?.run(&jobs)?;
            print_json(&rows)
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse epoch milliseconds or an RFC 3339 timestamp.
fn parse_time(text: &str) -> Result<i64> {
    if let Ok(millis) = text.parse::<i64>() {
        return Ok(millis);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.timestamp_millis())
        .map_err(|e| HistorianError::Parse(format!("invalid time {:?}: {}", text, e)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| HistorianError::Parse(e.to_string()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| HistorianError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
