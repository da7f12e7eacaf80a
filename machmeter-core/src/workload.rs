//! The Workload Contract
//!
//! A workload is a plain function handed a [`WorkloadContext`]: the chosen
//! execution strategy plus any datasets the harness resolved for it. The
//! workload performs every parallelizable inner loop through
//! [`WorkloadContext::map`] and never spawns concurrency of its own, which
//! is what lets the harness swap the strategy underneath it.

use std::collections::HashMap;

use crate::error::ExecutionError;
use crate::strategy::ExecStrategy;

/// Resolved datasets, keyed by the name the descriptor declared.
pub type DatasetMap = HashMap<String, Vec<u8>>;

/// The function signature every benchmark must satisfy.
pub type WorkloadFn = fn(&WorkloadContext) -> Result<(), ExecutionError>;

/// A named external dataset a workload needs before it can run.
///
/// Declared on the descriptor so the requirement is introspectable without
/// invoking the workload; the harness resolves and injects the bytes before
/// the timed interval starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Dataset name; doubles as the cache file name.
    pub name: &'static str,
    /// Source URL. A `.gz` suffix means the payload is gzip-compressed and
    /// is decompressed transparently on read.
    pub url: &'static str,
}

/// One entry of the benchmark suite.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadDescriptor {
    /// Human-readable benchmark name; defines report order together with
    /// the registry position.
    pub name: &'static str,
    /// The workload function.
    pub run: WorkloadFn,
    /// Whether the workload benefits from (and is run under) the parallel
    /// strategy in addition to the serial one.
    pub supports_parallel: bool,
    /// External datasets to resolve before invocation.
    pub datasets: &'static [DatasetSpec],
}

/// Everything a workload sees while it runs.
pub struct WorkloadContext<'a> {
    strategy: &'a ExecStrategy,
    datasets: &'a DatasetMap,
}

impl<'a> WorkloadContext<'a> {
    /// Build a context from a strategy and the resolved datasets.
    pub fn new(strategy: &'a ExecStrategy, datasets: &'a DatasetMap) -> Self {
        Self { strategy, datasets }
    }

    /// Worker count available to this invocation (1 under the serial
    /// strategy). Workloads may use it to size chunks, nothing else.
    pub fn workers(&self) -> usize {
        self.strategy.workers()
    }

    /// Apply `item_fn` across `items` under the invocation's strategy.
    /// Results come back in input order regardless of worker scheduling.
    pub fn map<T, R, F>(&self, item_fn: F, items: Vec<T>) -> Result<Vec<R>, ExecutionError>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R, ExecutionError> + Send + Sync,
    {
        self.strategy.map(item_fn, items)
    }

    /// Bytes of a dataset the descriptor declared.
    pub fn dataset(&self, name: &str) -> Result<&[u8], ExecutionError> {
        self.datasets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ExecutionError::MissingDataset(name.to_string()))
    }
}

/// The ordered catalogue of benchmarks forming a suite.
///
/// An explicit, constructed value passed into the driver: iteration order
/// is construction order and defines both run and report order. Static for
/// a given build; extending the suite means adding an entry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<WorkloadDescriptor>,
}

impl Registry {
    /// Build a registry from descriptors in run order.
    pub fn new(entries: Vec<WorkloadDescriptor>) -> Self {
        Self { entries }
    }

    /// Iterate descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkloadDescriptor> {
        self.entries.iter()
    }

    /// Number of registered benchmarks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: &WorkloadContext) -> Result<(), ExecutionError> {
        Ok(())
    }

    #[test]
    fn registry_preserves_construction_order() {
        let registry = Registry::new(vec![
            WorkloadDescriptor {
                name: "b",
                run: noop,
                supports_parallel: false,
                datasets: &[],
            },
            WorkloadDescriptor {
                name: "a",
                run: noop,
                supports_parallel: true,
                datasets: &[],
            },
        ]);

        let names: Vec<&str> = registry.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn context_exposes_declared_datasets() {
        let strategy = ExecStrategy::Serial;
        let mut datasets = DatasetMap::new();
        datasets.insert("hamlet".to_string(), b"to be".to_vec());
        let ctx = WorkloadContext::new(&strategy, &datasets);

        assert_eq!(ctx.dataset("hamlet").unwrap(), b"to be");
        assert!(matches!(
            ctx.dataset("macbeth"),
            Err(ExecutionError::MissingDataset(name)) if name == "macbeth"
        ));
    }

    #[test]
    fn context_map_runs_under_the_given_strategy() {
        let strategy = ExecStrategy::Serial;
        let datasets = DatasetMap::new();
        let ctx = WorkloadContext::new(&strategy, &datasets);

        assert_eq!(ctx.workers(), 1);
        let out = ctx.map(|x: u32| Ok(x + 1), vec![1, 2, 3]).unwrap();
        assert_eq!(out, vec![2, 3, 4]);
    }
}
