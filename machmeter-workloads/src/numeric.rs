//! Numeric workloads: ML primitives on deterministic point clouds.

use machmeter_core::{ExecutionError, WorkloadContext};

use crate::synth;

const CHUNKS_PER_WORKER: usize = 4;

fn chunked<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    let size = items.len().div_ceil(parts.max(1)).max(1);
    items.chunks(size).map(<[T]>::to_vec).collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

// ─── nearest neighbors ───────────────────────────────────────────────────────

const NN_TRAIN: usize = 8192;
const NN_QUERIES: usize = 2048;
const NN_DIMS: usize = 16;
const NN_CLASSES: usize = 16;
const NN_SEED_TRAIN: u64 = 0x6d61_6368_0004;
const NN_SEED_QUERY: u64 = 0x6d61_6368_0005;

/// Brute-force 1-nearest-neighbor classification of a deterministic query
/// set against a deterministic training set, queries partitioned across
/// the strategy.
pub fn nearest_neighbors(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let train = synth::points(NN_TRAIN, NN_DIMS, NN_SEED_TRAIN);
    let queries = synth::points(NN_QUERIES, NN_DIMS, NN_SEED_QUERY);
    let batches = chunked(&queries, ctx.workers() * CHUNKS_PER_WORKER);

    let histograms = ctx.map(
        |batch: Vec<Vec<f64>>| {
            let mut histogram = [0usize; NN_CLASSES];
            for query in &batch {
                histogram[nearest(&train, query) % NN_CLASSES] += 1;
            }
            Ok(histogram)
        },
        batches,
    )?;

    let classified: usize = histograms.iter().flat_map(|h| h.iter()).sum();
    if classified != NN_QUERIES {
        return Err(ExecutionError::workload(format!(
            "classified {classified} queries, expected {NN_QUERIES}"
        )));
    }
    Ok(())
}

/// Index of the training point closest to `query`.
fn nearest(train: &[Vec<f64>], query: &[f64]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, point) in train.iter().enumerate() {
        let distance = squared_distance(point, query);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

// ─── k-means ─────────────────────────────────────────────────────────────────

const KM_POINTS: usize = 20_000;
const KM_DIMS: usize = 8;
const KM_CLUSTERS: usize = 32;
const KM_ITERATIONS: usize = 20;
const KM_SEED: u64 = 0x6d61_6368_0006;

/// Lloyd's algorithm for a fixed iteration count; the assignment step maps
/// point batches through the strategy, the update step folds the partial
/// sums in the driver thread.
pub fn kmeans(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let points = synth::points(KM_POINTS, KM_DIMS, KM_SEED);
    let mut centroids: Vec<Vec<f64>> = points[..KM_CLUSTERS].to_vec();

    for _ in 0..KM_ITERATIONS {
        let batches = chunked(&points, ctx.workers() * CHUNKS_PER_WORKER);
        let partials = ctx.map(
            |batch: Vec<Vec<f64>>| Ok(assign_batch(&batch, &centroids)),
            batches,
        )?;
        centroids = fold_partials(&partials, &centroids);
    }

    if centroids.len() != KM_CLUSTERS {
        return Err(ExecutionError::workload("lost a centroid"));
    }
    Ok(())
}

/// Per-batch cluster sums and member counts.
fn assign_batch(batch: &[Vec<f64>], centroids: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<usize>) {
    let dims = centroids[0].len();
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for point in batch {
        let cluster = nearest(centroids, point);
        counts[cluster] += 1;
        for (accumulated, coordinate) in sums[cluster].iter_mut().zip(point) {
            *accumulated += coordinate;
        }
    }
    (sums, counts)
}

/// New centroids from the folded partial sums. An emptied cluster keeps
/// its previous centroid.
fn fold_partials(
    partials: &[(Vec<Vec<f64>>, Vec<usize>)],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dims = previous[0].len();
    let mut sums = vec![vec![0.0; dims]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (partial_sums, partial_counts) in partials {
        for cluster in 0..previous.len() {
            counts[cluster] += partial_counts[cluster];
            for d in 0..dims {
                sums[cluster][d] += partial_sums[cluster][d];
            }
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

// ─── matrix multiply ─────────────────────────────────────────────────────────

const MM_SIZE: usize = 768;
const MM_SEED_A: u64 = 0x6d61_6368_0007;
const MM_SEED_B: u64 = 0x6d61_6368_0008;

/// Dense row-major matrix product with row ranges partitioned across the
/// strategy; the folded checksum guards against dead-code elimination.
pub fn matrix_multiply(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let a = synth::matrix(MM_SIZE, MM_SEED_A);
    let b = synth::matrix(MM_SIZE, MM_SEED_B);
    let rows: Vec<usize> = (0..MM_SIZE).collect();
    let row_chunks = chunked(&rows, ctx.workers() * CHUNKS_PER_WORKER);

    let partial_sums = ctx.map(
        |chunk: Vec<usize>| Ok(multiply_rows(&a, &b, &chunk, MM_SIZE)),
        row_chunks,
    )?;

    let checksum: f64 = partial_sums.iter().sum();
    if !checksum.is_finite() {
        return Err(ExecutionError::workload("non-finite product checksum"));
    }
    Ok(())
}

/// Sum of the product entries for the given rows of `a * b`.
fn multiply_rows(a: &[f64], b: &[f64], rows: &[usize], n: usize) -> f64 {
    let mut checksum = 0.0;
    for &i in rows {
        for j in 0..n {
            let mut cell = 0.0;
            for k in 0..n {
                cell += a[i * n + k] * b[k * n + j];
            }
            checksum += cell;
        }
    }
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;
    use machmeter_core::{DatasetMap, ExecStrategy};

    #[test]
    fn nearest_prefers_the_closest_point() {
        let train = vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![1.0, 1.0]];
        assert_eq!(nearest(&train, &[0.9, 0.9]), 2);
        assert_eq!(nearest(&train, &[9.0, 9.0]), 1);
    }

    #[test]
    fn assignment_counts_every_point_once() {
        let points = synth::points(100, 4, 1);
        let centroids = points[..5].to_vec();
        let (_, counts) = assign_batch(&points, &centroids);
        assert_eq!(counts.iter().sum::<usize>(), 100);
    }

    #[test]
    fn folding_partials_matches_single_batch_assignment() {
        let points = synth::points(64, 4, 2);
        let centroids = points[..4].to_vec();

        let whole = fold_partials(&[assign_batch(&points, &centroids)], &centroids);
        let halves = fold_partials(
            &[
                assign_batch(&points[..32], &centroids),
                assign_batch(&points[32..], &centroids),
            ],
            &centroids,
        );
        for (a, b) in whole.iter().zip(&halves) {
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn empty_cluster_keeps_its_centroid() {
        let centroids = vec![vec![0.0, 0.0], vec![100.0, 100.0]];
        let points = vec![vec![0.1, 0.1], vec![-0.1, 0.2]];
        let (sums, counts) = assign_batch(&points, &centroids);
        let updated = fold_partials(&[(sums, counts)], &centroids);
        assert_eq!(updated[1], vec![100.0, 100.0]);
    }

    #[test]
    fn row_partitioned_product_matches_whole_product() {
        let n = 8;
        let a = synth::matrix(n, 11);
        let b = synth::matrix(n, 12);
        let all: Vec<usize> = (0..n).collect();

        let whole = multiply_rows(&a, &b, &all, n);
        let split = multiply_rows(&a, &b, &all[..3], n) + multiply_rows(&a, &b, &all[3..], n);
        assert!((whole - split).abs() < 1e-9);
    }

    #[test]
    fn chunked_covers_all_items_in_order() {
        let items: Vec<u32> = (0..10).collect();
        let chunks = chunked(&items, 3);
        let rejoined: Vec<u32> = chunks.concat();
        assert_eq!(rejoined, items);

        assert_eq!(chunked(&Vec::<u32>::new(), 4).len(), 0);
    }

    // Serial and parallel runs must produce the same domain result; the
    // checksum path in matrix_multiply is the observable.
    #[test]
    fn matrix_product_is_strategy_independent() {
        let a = synth::matrix(16, 21);
        let b = synth::matrix(16, 22);
        let rows: Vec<usize> = (0..16).collect();

        let serial = ExecStrategy::Serial;
        let parallel = ExecStrategy::Parallel { workers: 4 };
        let datasets = DatasetMap::new();

        let serial_sum: f64 = WorkloadContext::new(&serial, &datasets)
            .map(
                |chunk: Vec<usize>| Ok(multiply_rows(&a, &b, &chunk, 16)),
                chunked(&rows, 4),
            )
            .unwrap()
            .iter()
            .sum();
        let parallel_sum: f64 = WorkloadContext::new(&parallel, &datasets)
            .map(
                |chunk: Vec<usize>| Ok(multiply_rows(&a, &b, &chunk, 16)),
                chunked(&rows, 4),
            )
            .unwrap()
            .iter()
            .sum();

        assert_eq!(serial_sum, parallel_sum);
    }
}
