//! SHA-512 hashing workload.

use machmeter_core::{ExecutionError, WorkloadContext};
use sha2::{Digest, Sha512};

use crate::synth;

const BLOCK_BYTES: usize = 4 * 1024 * 1024;
const BLOCKS: usize = 16;
const ROUNDS: usize = 8;
const SEED: u64 = 0x6d61_6368_0002;

/// Hash sixteen deterministic 4 MiB blocks, re-hashing each digest for a
/// fixed number of rounds to keep the work CPU-bound rather than
/// allocation-bound.
pub fn sha512(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let blocks: Vec<Vec<u8>> = (0..BLOCKS)
        .map(|i| synth::bytes(BLOCK_BYTES, SEED.wrapping_add(i as u64)))
        .collect();

    let digests = ctx.map(hash_block, blocks)?;

    if digests.len() != BLOCKS {
        return Err(ExecutionError::workload("digest count mismatch"));
    }
    Ok(())
}

fn hash_block(block: Vec<u8>) -> Result<[u8; 64], ExecutionError> {
    let mut digest = Sha512::digest(&block);
    for _ in 1..ROUNDS {
        digest = Sha512::digest(digest);
    }
    Ok(digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let a = hash_block(synth::bytes(1024, 9)).unwrap();
        let b = hash_block(synth::bytes(1024, 9)).unwrap();
        assert_eq!(a, b);

        let c = hash_block(synth::bytes(1024, 10)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn rounds_change_the_digest() {
        let block = synth::bytes(1024, 9);
        let single: [u8; 64] = Sha512::digest(&block).into();
        let rolled = hash_block(block).unwrap();
        assert_ne!(single, rolled);
    }
}
