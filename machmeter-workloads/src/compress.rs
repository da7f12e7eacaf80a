//! Deflate compression workload.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use machmeter_core::{ExecutionError, WorkloadContext};

use crate::synth;

const CORPUS_BYTES: usize = 16 * 1024 * 1024;
const CHUNK_BYTES: usize = 1024 * 1024;
const SEED: u64 = 0x6d61_6368_0001;

/// Compress a deterministic 16 MiB pseudo-text corpus in 1 MiB chunks at
/// the highest compression level.
pub fn deflate(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let corpus = synth::text(CORPUS_BYTES, SEED);
    let chunks: Vec<Vec<u8>> = corpus.chunks(CHUNK_BYTES).map(<[u8]>::to_vec).collect();

    let sizes = ctx.map(compress_chunk, chunks)?;

    let total: usize = sizes.iter().sum();
    if total == 0 {
        return Err(ExecutionError::workload("deflate produced no output"));
    }
    Ok(())
}

fn compress_chunk(chunk: Vec<u8>) -> Result<usize, ExecutionError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&chunk)
        .map_err(ExecutionError::workload)?;
    let compressed = encoder.finish().map_err(ExecutionError::workload)?;
    Ok(compressed.len())
}
