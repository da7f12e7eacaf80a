#![warn(missing_docs)]
//! # Machmeter
//!
//! Cross-machine benchmark harness. Runs a fixed suite of workloads under
//! serial and worker-pool execution, times each invocation, and reduces
//! the timings into two integer scores normalized so a designated
//! reference machine scores 1000:
//!
//! ```text
//! score = round(reference_mean / measured_mean * 1000)
//! ```
//!
//! Higher is faster; the score scales inversely and linearly with the
//! mean wall-clock time.
//!
//! ## Quick Start
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     machmeter::run()
//! }
//! ```
//!
//! ## Custom suites
//!
//! The registry is an explicit value, so a reduced or extended suite is
//! just a different `Registry` handed to the [`Driver`]:
//!
//! ```ignore
//! use machmeter::prelude::*;
//!
//! fn spin(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
//!     ctx.map(|x: u64| Ok(x.wrapping_mul(x)), (0..1 << 20).collect())?;
//!     Ok(())
//! }
//!
//! let registry = Registry::new(vec![WorkloadDescriptor {
//!     name: "spin",
//!     run: spin,
//!     supports_parallel: true,
//!     datasets: &[],
//! }]);
//! ```

// Re-export the engine
pub use machmeter_core::{
    CoreMode, DatasetMap, DatasetSpec, EmptySamples, ExecStrategy, ExecutionError,
    MULTI_CORE_REFERENCE, Registry, SINGLE_CORE_REFERENCE, Timing, TimingRecord, WorkloadContext,
    WorkloadDescriptor, WorkloadFn, normalized_score, raw_mean, time_workload,
};

// Re-export dataset acquisition
pub use machmeter_data::{DEFAULT_CACHE_DIR, DataStore, DatasetError, DatasetSource, HttpSource};

// Re-export the standard suite
pub use machmeter_workloads::standard_suite;

// Re-export the CLI harness
pub use machmeter_cli::{Cli, Driver, DriverConfig, MachConfig, ScoreReport, SuiteTimings, run};

/// Prelude for building custom suites.
pub mod prelude {
    pub use crate::{
        CoreMode, Driver, DriverConfig, ExecStrategy, ExecutionError, Registry, WorkloadContext,
        WorkloadDescriptor, normalized_score,
    };
}
