//! deterministic rng seeded by a leaf derivation seed
//!
//! each output word hashes a 64-byte block:
//!
//! ```text
//! [0..32]  leaf seed
//! [32..48] zero
//! [48..64] call index, u128 little-endian
//! ```
//!
//! and takes the first 8 digest bytes as a little-endian u64.

use rand_core::{impls, Error as RngError, RngCore};
use sha2::{Digest, Sha256};

use crate::seed::{DerivationSeed, SEED_LEN};

const BLOCK_LEN: usize = SEED_LEN * 2;
const INDEX_OFFSET: usize = SEED_LEN * 3 / 2;

/// reproducible randomness for a scramble generator
#[derive(Debug, Clone)]
pub struct SeedRng {
    seed: DerivationSeed,
    index: u128,
}

impl SeedRng {
    pub fn new(seed: DerivationSeed) -> Self {
        Self { seed, index: 0 }
    }

    /// number of words produced so far
    pub fn index(&self) -> u128 {
        self.index
    }
}

impl RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut block = [0u8; BLOCK_LEN];
        block[..SEED_LEN].copy_from_slice(self.seed.as_bytes());
        block[INDEX_OFFSET..].copy_from_slice(&self.index.to_le_bytes());

        let digest = Sha256::digest(block);
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);

        self.index = self.index.wrapping_add(1);
        u64::from_le_bytes(word)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}
