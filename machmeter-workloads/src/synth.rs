//! Deterministic input generation.
//!
//! All suite inputs come from seeded [`StdRng`] streams so every machine
//! benchmarks identical work.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random bytes.
pub(crate) fn bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = vec![0u8; len];
    rng.fill(&mut out[..]);
    out
}

const WORDS: &[&str] = &[
    "the", "of", "and", "to", "in", "that", "machine", "worker", "pool", "score", "sample",
    "vector", "cache", "latency", "throughput", "measure", "suite", "serial", "parallel", "clock",
];

/// Pseudo-text built from a small vocabulary; compresses like prose rather
/// than like noise.
pub(crate) fn text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        out.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())].as_bytes());
        out.push(if rng.gen_ratio(1, 12) { b'\n' } else { b' ' });
    }
    out.truncate(len);
    out
}

/// `n` points in `dims` dimensions, coordinates in [-1, 1).
pub(crate) fn points(n: usize, dims: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dims).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

/// Row-major `n` x `n` matrix, entries in [-1, 1).
pub(crate) fn matrix(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}
