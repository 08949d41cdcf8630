//! one-way, context-binding seed derivation
//!
//! one step:
//!
//! ```text
//! hashed_salt = sha256(salt)
//! child       = sha256(parent || hashed_salt)
//! child[0]    = 0x67
//! child[1]    = min(parent[1] + 1, 0xff)
//! ```
//!
//! a hierarchy folds an ordered path of salts through single steps.
//! there is no randomness in here; unpredictability comes from the root
//! seed and the salts.

use sha2::{Digest, Sha256};

use crate::salt::{validate_salt, DerivationPath, Salt};
use crate::seed::{validate_seed, DerivationSeed, SEED_LEN};
use crate::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// hash primitive used by the deriver
///
/// the digest must be sha-256 over the concatenation of `chunks`; other
/// implementations exist to route hashing through a platform provider.
pub trait HashProvider: Send + Sync {
    fn sha256(&self, chunks: &[&[u8]]) -> [u8; SEED_LEN];
}

/// in-process sha-256 from the `sha2` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Provider;

impl HashProvider for Sha256Provider {
    fn sha256(&self, chunks: &[&[u8]]) -> [u8; SEED_LEN] {
        let mut hasher = Sha256::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        hasher.finalize().into()
    }
}

/// check a raw parent seed and salt before a derivation step
pub fn validate(parent_seed: &[u8], salt: &[u8]) -> Result<()> {
    validate_seed(parent_seed)?;
    validate_salt(salt)
}

/// single derivation step over raw buffers
pub fn derive(parent_seed: &[u8], salt: &[u8]) -> Result<DerivationSeed> {
    Deriver::sha256().derive_bytes(parent_seed, salt)
}

/// fold `path` from `root` down to a leaf seed
pub fn derive_hierarchy(root: &DerivationSeed, path: &DerivationPath) -> DerivationSeed {
    Deriver::sha256().derive_hierarchy(root, path)
}

/// stateless derivation context holding the hash provider
#[derive(Debug, Clone, Default)]
pub struct Deriver<H: HashProvider = Sha256Provider> {
    hasher: H,
}

impl Deriver<Sha256Provider> {
    pub const fn sha256() -> Self {
        Self {
            hasher: Sha256Provider,
        }
    }
}

impl<H: HashProvider> Deriver<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// derive one child seed; typed inputs are already validated
    pub fn derive(&self, parent: &DerivationSeed, salt: &Salt) -> DerivationSeed {
        self.step(parent, salt.as_bytes())
    }

    /// derive one child seed from untyped buffers, validating first
    pub fn derive_bytes(&self, parent_seed: &[u8], salt: &[u8]) -> Result<DerivationSeed> {
        validate(parent_seed, salt)?;
        let parent = DerivationSeed::from_slice(parent_seed)?;
        Ok(self.step(&parent, salt))
    }

    /// fold salts in order; the empty path returns `root` unchanged
    pub fn derive_hierarchy<'a>(
        &self,
        root: &DerivationSeed,
        salts: impl IntoIterator<Item = &'a Salt>,
    ) -> DerivationSeed {
        salts
            .into_iter()
            .fold(*root, |seed, salt| self.derive(&seed, salt))
    }

    /// derive many independent paths below the same root
    #[cfg(feature = "parallel")]
    pub fn derive_hierarchies(
        &self,
        root: &DerivationSeed,
        paths: &[DerivationPath],
    ) -> Vec<DerivationSeed> {
        paths
            .par_iter()
            .map(|path| self.derive_hierarchy(root, path))
            .collect()
    }

    /// derive many independent paths below the same root
    #[cfg(not(feature = "parallel"))]
    pub fn derive_hierarchies(
        &self,
        root: &DerivationSeed,
        paths: &[DerivationPath],
    ) -> Vec<DerivationSeed> {
        paths
            .iter()
            .map(|path| self.derive_hierarchy(root, path))
            .collect()
    }

    fn step(&self, parent: &DerivationSeed, salt: &[u8]) -> DerivationSeed {
        let hashed_salt = self.hasher.sha256(&[salt]);
        let digest = self
            .hasher
            .sha256(&[parent.as_bytes().as_slice(), hashed_salt.as_slice()]);
        DerivationSeed::from_digest(digest, parent.level())
    }
}
