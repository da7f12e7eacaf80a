//! Score Reduction
//!
//! Turns a sequence of per-benchmark wall-clock seconds into one integer
//! score, normalized against the raw mean of a designated reference
//! machine. The reference machine scores exactly 1000; halving the mean
//! doubles the score.

use thiserror::Error;

/// Raw mean of the reference machine's single-core suite run.
pub const SINGLE_CORE_REFERENCE: f64 = 17.156576803752355;

/// Raw mean of the reference machine's multi-core suite run.
pub const MULTI_CORE_REFERENCE: f64 = 33.75305533409119;

/// Attempted to reduce an empty sample sequence.
///
/// Unreachable under the driver invariant of one sample per registry entry,
/// but guarded rather than trusted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot reduce an empty sample sequence")]
pub struct EmptySamples;

/// Arithmetic mean of per-benchmark seconds; lower means faster.
pub fn raw_mean(samples: &[f64]) -> Result<f64, EmptySamples> {
    if samples.is_empty() {
        return Err(EmptySamples);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Normalized integer score: `round(reference / raw_mean * 1000)`.
///
/// Rounds to the nearest integer, ties away from zero (`f64::round`).
/// The score scales inversely and linearly with the mean.
pub fn normalized_score(samples: &[f64], reference: f64) -> Result<i64, EmptySamples> {
    let mean = raw_mean(samples)?;
    Ok((reference / mean * 1000.0).round() as i64)
}
