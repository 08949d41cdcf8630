//! xor secret sharding for low-risk storage of a root seed
//!
//! `n - 1` shares are uniformly random, the last one is the secret xor'd
//! with all of them. all `n` shares are required: this is not a threshold
//! scheme, and it is not tamper-evident. a missing or corrupted share
//! reconstructs to a different value, not to an error.
//!
//! shard files hold one hex-encoded share per line, in generation order.

use std::fmt;
use std::path::Path;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::seed::{DerivationSeed, SEED_LEN};
use crate::{Error, Result};

/// share count used when none is configured
pub const DEFAULT_SHARE_COUNT: usize = 1024;

/// one xor share of a 32-byte secret
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SecretShare([u8; SEED_LEN]);

impl SecretShare {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidHex(e.to_string()))?;
        let bytes: [u8; SEED_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for SecretShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretShare(..)")
    }
}

/// sharding settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// number of shares produced and required
    pub count: usize,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_SHARE_COUNT,
        }
    }
}

impl ShardConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidShareCount);
        }
        Ok(())
    }
}

fn xor_into(acc: &mut [u8; SEED_LEN], share: &[u8; SEED_LEN]) {
    for (a, b) in acc.iter_mut().zip(share.iter()) {
        *a ^= b;
    }
}

/// split a 32-byte secret into `n` xor shares
pub fn to_shares<R: RngCore + CryptoRng>(
    secret: &[u8; SEED_LEN],
    n: usize,
    rng: &mut R,
) -> Result<Vec<SecretShare>> {
    if n == 0 {
        return Err(Error::InvalidShareCount);
    }

    let mut shares = Vec::with_capacity(n);
    let mut last = *secret;
    for _ in 1..n {
        let mut share = [0u8; SEED_LEN];
        rng.fill_bytes(&mut share);
        xor_into(&mut last, &share);
        shares.push(SecretShare(share));
    }
    shares.push(SecretShare(last));
    Ok(shares)
}

/// xor all shares together; order does not matter
pub fn from_shares(shares: &[SecretShare]) -> Result<[u8; SEED_LEN]> {
    if shares.is_empty() {
        return Err(Error::NoShares);
    }
    let mut secret = [0u8; SEED_LEN];
    for share in shares {
        xor_into(&mut secret, &share.0);
    }
    Ok(secret)
}

/// like [`from_shares`], but refuse a set of the wrong size
///
/// this only counts shares; a substituted share still goes unnoticed.
pub fn from_shares_checked(shares: &[SecretShare], expected: usize) -> Result<[u8; SEED_LEN]> {
    if shares.len() != expected {
        return Err(Error::IncompleteShareSet {
            have: shares.len(),
            need: expected,
        });
    }
    from_shares(shares)
}

/// shard a derivation seed according to `config`
pub fn split_seed<R: RngCore + CryptoRng>(
    seed: &DerivationSeed,
    config: &ShardConfig,
    rng: &mut R,
) -> Result<Vec<SecretShare>> {
    config.validate()?;
    to_shares(seed.as_bytes(), config.count, rng)
}

/// reconstruct a derivation seed, checking share count and sentinel
pub fn combine_seed(shares: &[SecretShare], config: &ShardConfig) -> Result<DerivationSeed> {
    config.validate()?;
    let bytes = from_shares_checked(shares, config.count)?;
    DerivationSeed::try_new(bytes)
}

/// newline-separated hex, no trailing newline
pub fn encode_shard_file(shares: &[SecretShare]) -> String {
    shares
        .iter()
        .map(SecretShare::to_hex)
        .collect::<Vec<_>>()
        .join("\n")
}

/// parse a shard file; blank lines are skipped
pub fn decode_shard_file(text: &str) -> Result<Vec<SecretShare>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            SecretShare::from_hex(line.trim()).map_err(|e| Error::InvalidShardLine {
                line: i + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn write_shard_file(path: impl AsRef<Path>, shares: &[SecretShare]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, encode_shard_file(shares))?;
    debug!(path = %path.display(), count = shares.len(), "shard file written");
    Ok(())
}

pub fn read_shard_file(path: impl AsRef<Path>) -> Result<Vec<SecretShare>> {
    let path = path.as_ref();
    let shares = decode_shard_file(&std::fs::read_to_string(path)?)?;
    debug!(path = %path.display(), count = shares.len(), "shard file read");
    Ok(shares)
}
