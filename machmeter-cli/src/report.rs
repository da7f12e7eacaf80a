//! Score Report
//!
//! Machine-readable summary of one suite run: system metadata, the
//! per-(benchmark, mode) timings, and the normalized scores. Written as
//! JSON only when requested; the console lines stay the primary output.

use chrono::{DateTime, Utc};
use machmeter_core::Timing;
use serde::Serialize;

use crate::driver::SuiteTimings;

/// Report metadata: harness version and host facts.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// Harness version.
    pub version: String,
    /// UTC time the report was generated.
    pub timestamp: DateTime<Utc>,
    /// Operating system name.
    pub os: String,
    /// CPU architecture.
    pub arch: String,
    /// Worker count used for multi-core runs.
    pub workers: usize,
}

/// One (benchmark, mode) timing entry.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkEntry {
    /// Benchmark name.
    pub name: String,
    /// `single-core` or `multi-core`.
    pub mode: String,
    /// Measured seconds; `null` when the run was skipped.
    pub seconds: Option<f64>,
}

/// Complete score report.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Metadata block.
    pub meta: ReportMeta,
    /// Timings in run order.
    pub benchmarks: Vec<BenchmarkEntry>,
    /// Normalized single-core score.
    pub single_core_score: i64,
    /// Normalized multi-core score, absent on single-worker hosts or
    /// suites without parallel-capable entries.
    pub multi_core_score: Option<i64>,
}

/// Assemble a report from a finished run.
pub fn build_report(
    timings: &SuiteTimings,
    workers: usize,
    single_core_score: i64,
    multi_core_score: Option<i64>,
) -> ScoreReport {
    let benchmarks = timings
        .records()
        .iter()
        .map(|record| BenchmarkEntry {
            name: record.name.to_string(),
            mode: record.mode.to_string(),
            seconds: match record.timing {
                Timing::Seconds(s) => Some(s),
                Timing::Skipped => None,
            },
        })
        .collect();

    ScoreReport {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            workers,
        },
        benchmarks,
        single_core_score,
        multi_core_score,
    }
}

/// Serialize a report as prettified JSON.
pub fn generate_json_report(report: &ScoreReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
