//! Harness Driver
//!
//! Iterates the registry in order and runs every benchmark once per
//! applicable mode: always under the serial strategy, and additionally
//! under the parallel strategy when the descriptor supports it and the
//! host has more than one worker. Strictly sequential: no two benchmarks
//! overlap, and concurrency exists only inside one parallel `map`.
//!
//! Datasets are resolved before each timed invocation, so acquisition
//! time never leaks into a measurement. In download-only mode every
//! dataset is resolved, every timing is recorded as skipped, and nothing
//! per-benchmark is printed.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use indicatif::ProgressBar;
use machmeter_core::{
    CoreMode, DatasetMap, ExecStrategy, Registry, TimingRecord, WorkloadContext,
    WorkloadDescriptor, time_workload,
};
use machmeter_data::{DataStore, DatasetSource};
use tracing::debug;

/// Driver settings, resolved from config and CLI.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Host worker count for multi-core runs.
    pub workers: usize,
    /// Resolve datasets but skip every timed invocation.
    pub download_only: bool,
}

/// Ordered timings accumulated across one suite run.
#[derive(Debug, Default)]
pub struct SuiteTimings {
    records: Vec<TimingRecord>,
}

impl SuiteTimings {
    /// All records, in run order.
    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    /// Measured seconds for one core mode, in run order; skipped runs are
    /// excluded.
    pub fn samples(&self, mode: CoreMode) -> Vec<f64> {
        self.records
            .iter()
            .filter(|record| record.mode == mode)
            .filter_map(|record| record.timing.seconds())
            .collect()
    }
}

/// Runs a registry against a dataset store, writing live progress lines.
pub struct Driver<W> {
    registry: Registry,
    config: DriverConfig,
    out: W,
}

impl<W: Write> Driver<W> {
    /// Build a driver over an explicit registry.
    pub fn new(registry: Registry, config: DriverConfig, out: W) -> Self {
        Self {
            registry,
            config,
            out,
        }
    }

    /// Run the whole suite. A single benchmark failure aborts the run;
    /// there is no per-benchmark isolation, because a partial suite cannot
    /// produce a comparable score.
    pub fn run<S: DatasetSource>(&mut self, store: &DataStore<S>) -> anyhow::Result<SuiteTimings> {
        let DriverConfig {
            workers,
            download_only,
        } = self.config;
        debug!(workers, download_only, suite = self.registry.len(), "starting run");

        let mut timings = SuiteTimings::default();

        for descriptor in self.registry.iter() {
            let datasets = resolve_datasets(store, descriptor)?;

            run_mode(
                &mut self.out,
                &mut timings,
                descriptor,
                &datasets,
                CoreMode::Single,
                ExecStrategy::Serial,
                download_only,
            )?;

            if descriptor.supports_parallel && workers > 1 {
                run_mode(
                    &mut self.out,
                    &mut timings,
                    descriptor,
                    &datasets,
                    CoreMode::Multi,
                    ExecStrategy::Parallel { workers },
                    download_only,
                )?;
            }
        }

        Ok(timings)
    }
}

/// Resolve a descriptor's datasets outside the timed interval, with a
/// spinner so long fetches don't look like a hang.
fn resolve_datasets<S: DatasetSource>(
    store: &DataStore<S>,
    descriptor: &WorkloadDescriptor,
) -> anyhow::Result<DatasetMap> {
    if descriptor.datasets.is_empty() {
        return Ok(DatasetMap::new());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("resolving datasets for {}", descriptor.name));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let resolved = store.resolve(descriptor.datasets);
    spinner.finish_and_clear();

    resolved.with_context(|| format!("resolving datasets for `{}`", descriptor.name))
}

/// One (benchmark, mode) run: live console line, timing, record.
fn run_mode<W: Write>(
    out: &mut W,
    timings: &mut SuiteTimings,
    descriptor: &WorkloadDescriptor,
    datasets: &DatasetMap,
    mode: CoreMode,
    strategy: ExecStrategy,
    skip: bool,
) -> anyhow::Result<()> {
    if !skip {
        write!(out, "{} ({}): ", descriptor.name, mode)?;
        out.flush()?;
    }

    let ctx = WorkloadContext::new(&strategy, datasets);
    let timing = time_workload(descriptor, &ctx, skip)
        .with_context(|| format!("benchmark `{}` ({}) failed", descriptor.name, mode))?;

    if let Some(seconds) = timing.seconds() {
        writeln!(out, "{seconds:.3} seconds")?;
    }

    timings.records.push(TimingRecord {
        name: descriptor.name,
        mode,
        timing,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use machmeter_core::{DatasetSpec, ExecutionError};

    fn quick(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
        let doubled = ctx.map(|x: u64| Ok(x * 2), vec![1, 2, 3])?;
        assert_eq!(doubled, vec![2, 4, 6]);
        Ok(())
    }

    fn failing(_ctx: &WorkloadContext) -> Result<(), ExecutionError> {
        Err(ExecutionError::workload("fixture exploded"))
    }

    fn reads_fixture(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
        let bytes = ctx.dataset("fixture")?;
        ctx.map(|b: u8| Ok(b.count_ones()), bytes.to_vec())?;
        Ok(())
    }

    struct StaticSource(&'static [u8]);

    impl DatasetSource for StaticSource {
        fn fetch(&self, _url: &str) -> std::io::Result<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    fn fixture_registry() -> Registry {
        Registry::new(vec![
            WorkloadDescriptor {
                name: "serial only",
                run: quick,
                supports_parallel: false,
                datasets: &[],
            },
            WorkloadDescriptor {
                name: "both modes",
                run: quick,
                supports_parallel: true,
                datasets: &[],
            },
        ])
    }

    fn run_driver(registry: Registry, config: DriverConfig) -> (anyhow::Result<SuiteTimings>, String) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::with_source(dir.path(), StaticSource(b""));
        let mut driver = Driver::new(registry, config, Vec::new());
        let result = driver.run(&store);
        let output = String::from_utf8(driver.out).unwrap();
        (result, output)
    }

    #[test]
    fn parallel_capable_entries_run_twice_in_order() {
        let config = DriverConfig {
            workers: 4,
            download_only: false,
        };
        let (result, output) = run_driver(fixture_registry(), config);
        let timings = result.unwrap();

        let shape: Vec<(&str, CoreMode)> = timings
            .records()
            .iter()
            .map(|r| (r.name, r.mode))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("serial only", CoreMode::Single),
                ("both modes", CoreMode::Single),
                ("both modes", CoreMode::Multi),
            ]
        );
        assert_eq!(timings.samples(CoreMode::Single).len(), 2);
        assert_eq!(timings.samples(CoreMode::Multi).len(), 1);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("serial only (single-core): "));
        assert!(lines[2].starts_with("both modes (multi-core): "));
        assert!(lines.iter().all(|l| l.ends_with(" seconds")));
    }

    #[test]
    fn single_worker_host_never_runs_multi_core() {
        let config = DriverConfig {
            workers: 1,
            download_only: false,
        };
        let (result, _) = run_driver(fixture_registry(), config);
        let timings = result.unwrap();

        assert!(timings.records().iter().all(|r| r.mode == CoreMode::Single));
        assert!(timings.samples(CoreMode::Multi).is_empty());
    }

    #[test]
    fn download_only_skips_every_timing_and_prints_nothing() {
        let config = DriverConfig {
            workers: 4,
            download_only: true,
        };
        let (result, output) = run_driver(fixture_registry(), config);
        let timings = result.unwrap();

        assert_eq!(timings.records().len(), 3);
        assert!(timings.records().iter().all(|r| r.timing.is_skipped()));
        assert!(timings.samples(CoreMode::Single).is_empty());
        assert!(timings.samples(CoreMode::Multi).is_empty());
        assert!(output.is_empty(), "unexpected output: {output:?}");
    }

    #[test]
    fn workload_failure_aborts_the_suite() {
        let registry = Registry::new(vec![
            WorkloadDescriptor {
                name: "doomed",
                run: failing,
                supports_parallel: false,
                datasets: &[],
            },
            WorkloadDescriptor {
                name: "never reached",
                run: quick,
                supports_parallel: false,
                datasets: &[],
            },
        ]);
        let config = DriverConfig {
            workers: 2,
            download_only: false,
        };
        let (result, _) = run_driver(registry, config);

        let err = result.unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("fixture exploded"), "{chain}");
        assert!(chain.contains("doomed"), "{chain}");
    }

    #[test]
    fn declared_datasets_are_resolved_and_injected() {
        static FIXTURE: [DatasetSpec; 1] = [DatasetSpec {
            name: "fixture",
            url: "https://example.com/fixture.bin",
        }];
        let registry = Registry::new(vec![WorkloadDescriptor {
            name: "dataset reader",
            run: reads_fixture,
            supports_parallel: false,
            datasets: &FIXTURE,
        }]);

        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::with_source(dir.path(), StaticSource(b"\x01\x02\x03"));
        let config = DriverConfig {
            workers: 1,
            download_only: false,
        };
        let mut driver = Driver::new(registry, config, Vec::new());
        driver.run(&store).unwrap();
    }
}
