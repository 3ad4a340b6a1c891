//! Deterministic pseudo-random stream for validator sampling.
//!
//! The stream is a sha256 hash chain seeded purely from block-level data
//! (rolling seed, request sequence number, chain id). Every replica applying
//! the same block derives the same stream; host entropy and wall clocks never
//! feed it.

use sha2::{Digest, Sha256};

/// A seeded, reproducible random stream.
#[derive(Debug, Clone)]
pub struct Rng {
    state: [u8; 32],
}

impl Rng {
    /// Creates a stream from the concatenation of the given seed parts.
    pub fn new(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        Self {
            state: hasher.finalize().into(),
        }
    }

    /// Advances the chain and returns the next 64-bit draw.
    pub fn next_u64(&mut self) -> u64 {
        self.state = Sha256::digest(self.state).into();
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.state[..8]);
        u64::from_be_bytes(buf)
    }
}
