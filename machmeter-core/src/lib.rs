#![warn(missing_docs)]
//! Machmeter Core - Execution & Scoring Engine
//!
//! This crate provides the machinery the harness is built around:
//! - the workload contract ([`WorkloadDescriptor`], [`WorkloadContext`])
//! - interchangeable execution strategies ([`ExecStrategy`]: serial
//!   iteration or a fixed-size worker pool scoped to one `map` call)
//! - wall-clock timing of a single workload invocation ([`time_workload`])
//! - reduction of raw timings into normalized scores ([`normalized_score`])
//!
//! Everything here is deliberately I/O-free; dataset acquisition and the
//! CLI live in sibling crates.

mod error;
mod score;
mod strategy;
mod timer;
mod workload;

pub use error::ExecutionError;
pub use score::{
    EmptySamples, MULTI_CORE_REFERENCE, SINGLE_CORE_REFERENCE, normalized_score, raw_mean,
};
pub use strategy::ExecStrategy;
pub use timer::{CoreMode, Timing, TimingRecord, time_workload};
pub use workload::{DatasetMap, DatasetSpec, Registry, WorkloadContext, WorkloadDescriptor, WorkloadFn};
