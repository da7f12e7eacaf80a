//! Errors raised by the execution engine.

use thiserror::Error;

/// A workload invocation (or one of its parallel workers) failed.
///
/// The harness never catches this per-benchmark: a failing workload aborts
/// the whole suite, because a partial suite cannot produce a comparable
/// score.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The worker pool for a parallel `map` could not be constructed.
    #[error("worker pool construction failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A workload asked for a dataset the harness did not resolve.
    #[error("dataset `{0}` was not provided to the workload")]
    MissingDataset(String),

    /// The workload itself reported a failure.
    #[error("workload failed: {0}")]
    Workload(String),
}

impl ExecutionError {
    /// Build a [`ExecutionError::Workload`] from any displayable cause.
    pub fn workload(cause: impl std::fmt::Display) -> Self {
        ExecutionError::Workload(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workload_error_keeps_message() {
        let err = ExecutionError::workload("bad block at offset 42");
        assert_eq!(err.to_string(), "workload failed: bad block at offset 42");
    }

    #[test]
    fn missing_dataset_names_the_dataset() {
        let err = ExecutionError::MissingDataset("hamlet".to_string());
        assert!(err.to_string().contains("hamlet"));
    }
}
