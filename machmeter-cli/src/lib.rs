#![warn(missing_docs)]
//! Machmeter CLI Library
//!
//! Wires the pieces together: parses flags, discovers `machmeter.toml`,
//! builds the standard suite and a dataset store, drives the run, reduces
//! the timings into scores, and prints them. Use [`run`] from a binary's
//! `main`.

mod config;
mod driver;
mod report;

pub use config::{DataConfig, MachConfig, ReportConfig, RunnerConfig};
pub use driver::{Driver, DriverConfig, SuiteTimings};
pub use report::{BenchmarkEntry, ReportMeta, ScoreReport, build_report, generate_json_report};

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use machmeter_core::{CoreMode, MULTI_CORE_REFERENCE, SINGLE_CORE_REFERENCE, normalized_score};
use machmeter_data::DataStore;
use tracing::{debug, info};

/// Machmeter CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "machmeter")]
#[command(author, version, about = "machmeter - cross-machine benchmark harness")]
pub struct Cli {
    /// Download every declared dataset into the local cache and exit
    /// without timing anything
    #[arg(short = 'd', long)]
    pub download_data: bool,

    /// Keep cached datasets on disk after the run
    #[arg(short = 'k', long)]
    pub keep_data: bool,

    /// Worker count for multi-core runs (default: all available cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Write a JSON score report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the machmeter CLI. This is the entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("machmeter=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("machmeter=info")
            .init();
    }

    run_with_cli(cli)
}

/// Run with pre-parsed arguments (no logging setup; tests use this).
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Layering: built-in defaults <- machmeter.toml <- CLI flags.
    let config = MachConfig::discover().unwrap_or_default();
    let workers = cli
        .workers
        .or(config.runner.workers)
        .unwrap_or_else(host_workers)
        .max(1);
    let keep_data = cli.keep_data || config.runner.keep_data;
    debug!(workers, keep_data, "resolved configuration");

    let store = DataStore::new(&config.data.cache_dir);
    let registry = machmeter_workloads::standard_suite();
    let mut driver = Driver::new(
        registry,
        DriverConfig {
            workers,
            download_only: cli.download_data,
        },
        std::io::stdout(),
    );

    let timings = driver.run(&store)?;

    if cli.download_data {
        // Priming mode: cache is populated, nothing to reduce. The cache
        // is implicitly kept.
        info!(cache = %store.root().display(), "dataset cache primed");
        return Ok(());
    }

    let single_samples = timings.samples(CoreMode::Single);
    let multi_samples = timings.samples(CoreMode::Multi);

    let single_core_score = normalized_score(&single_samples, SINGLE_CORE_REFERENCE)?;
    let multi_core_score = if multi_samples.is_empty() {
        None
    } else {
        Some(normalized_score(&multi_samples, MULTI_CORE_REFERENCE)?)
    };

    println!();
    println!("single core score: {single_core_score}");
    if let Some(score) = multi_core_score {
        println!("multi core score: {score}");
    }

    let json_path = cli
        .json
        .or_else(|| config.report.json_path.as_ref().map(PathBuf::from));
    if let Some(path) = json_path {
        let report = build_report(&timings, workers, single_core_score, multi_core_score);
        let json = generate_json_report(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "score report written");
    }

    if !keep_data {
        store.purge()?;
    }

    Ok(())
}

/// Available worker count on this host.
fn host_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
