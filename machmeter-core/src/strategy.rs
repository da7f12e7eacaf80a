//! Execution Strategies
//!
//! Abstracts "apply a function to a sequence of items" so a workload is
//! agnostic to whether its inner loop runs serially or across N workers.
//! The two strategies are semantically interchangeable: identical inputs
//! produce identical results in input order; only latency differs.

use rayon::prelude::*;

use crate::error::ExecutionError;

/// How a workload's inner per-item function is applied across its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStrategy {
    /// Apply the item function to each item in the calling thread, in order.
    Serial,
    /// Distribute items across a pool of exactly `workers` threads.
    ///
    /// The pool is created for one `map` call and torn down before it
    /// returns, on all exit paths. Assignment of items to workers is
    /// unspecified; results are always returned in input order.
    Parallel {
        /// Pool size. The driver only constructs this with the host worker
        /// count, and only when it exceeds one; `Parallel` with a single
        /// worker is outside the contract (use `Serial` instead).
        workers: usize,
    },
}

impl ExecStrategy {
    /// The worker count a workload may use to partition its inputs.
    ///
    /// Always 1 for [`ExecStrategy::Serial`]; workloads must not change
    /// their observable behavior based on this value, only their chunking.
    pub fn workers(&self) -> usize {
        match self {
            ExecStrategy::Serial => 1,
            ExecStrategy::Parallel { workers } => *workers,
        }
    }

    /// Whether this strategy runs items on a worker pool.
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecStrategy::Parallel { .. })
    }

    /// Apply `item_fn` to every item, returning results in input order.
    ///
    /// The item function is fallible; the first item failure fails the
    /// whole call and the error is returned unchanged. Empty input returns
    /// an empty vector without invoking `item_fn`.
    pub fn map<T, R, F>(&self, item_fn: F, items: Vec<T>) -> Result<Vec<R>, ExecutionError>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R, ExecutionError> + Send + Sync,
    {
        match self {
            ExecStrategy::Serial => items.into_iter().map(item_fn).collect(),
            ExecStrategy::Parallel { workers } => {
                debug_assert!(*workers > 1, "parallel strategy requires more than one worker");
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*workers)
                    .build()?;
                // The pool lives exactly as long as this one map call.
                pool.install(|| items.into_par_iter().map(item_fn).collect())
            }
        }
    }
}
