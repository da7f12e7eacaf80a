//! Wall-Clock Timing
//!
//! Wraps a single workload invocation between two monotonic instants and
//! returns elapsed seconds, or the skip sentinel when timing is disabled
//! (download-only runs). Dataset resolution happens before the context is
//! built, so it is never part of the measured interval.

use std::fmt;
use std::time::Instant;

use crate::error::ExecutionError;
use crate::workload::{WorkloadContext, WorkloadDescriptor};

/// Outcome of timing one workload invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    /// Measured wall-clock duration of the invocation.
    Seconds(f64),
    /// The invocation was skipped; the workload was never called.
    Skipped,
}

impl Timing {
    /// Measured seconds, if the invocation was not skipped.
    pub fn seconds(self) -> Option<f64> {
        match self {
            Timing::Seconds(s) => Some(s),
            Timing::Skipped => None,
        }
    }

    /// Whether this is the skip sentinel.
    pub fn is_skipped(self) -> bool {
        matches!(self, Timing::Skipped)
    }
}

/// Which score a timing contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreMode {
    /// Serial strategy, one worker.
    Single,
    /// Parallel strategy, host worker count.
    Multi,
}

impl fmt::Display for CoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreMode::Single => f.write_str("single-core"),
            CoreMode::Multi => f.write_str("multi-core"),
        }
    }
}

/// One (benchmark, mode) measurement, folded into the aggregate sequences
/// after the run and otherwise discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    /// Benchmark name from the descriptor.
    pub name: &'static str,
    /// Core mode this run contributes to.
    pub mode: CoreMode,
    /// Measured seconds or the skip sentinel.
    pub timing: Timing,
}

/// Time one workload invocation under the context's strategy.
///
/// With `skip` set the workload is not invoked at all and
/// [`Timing::Skipped`] is returned immediately. A workload failure
/// propagates unchanged; it is never converted into a timing value.
pub fn time_workload(
    descriptor: &WorkloadDescriptor,
    ctx: &WorkloadContext<'_>,
    skip: bool,
) -> Result<Timing, ExecutionError> {
    if skip {
        return Ok(Timing::Skipped);
    }

    let start = Instant::now();
    (descriptor.run)(ctx)?;
    Ok(Timing::Seconds(start.elapsed().as_secs_f64()))
}
