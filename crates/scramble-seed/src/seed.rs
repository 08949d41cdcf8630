//! derivation seed type
//!
//! a derivation seed is always 32 bytes:
//!
//! ```text
//! ┌──────┬───────┬──────────────────────────────┐
//! │ 0x67 │ level │   30 bytes derived entropy   │
//! └──────┴───────┴──────────────────────────────┘
//!   [0]     [1]              [2..32]
//! ```
//!
//! the sentinel marks a buffer as belonging to this scheme, the level counts
//! derivation steps since the root (saturating at 0xff).

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::derive::Deriver;
use crate::salt::Salt;
use crate::{Error, Result};

/// byte length of every derivation seed
pub const SEED_LEN: usize = 32;

/// fixed first byte of every valid seed
pub const PROTOCOL_SENTINEL: u8 = 0x67;

/// level of a freshly generated root seed
pub const ROOT_LEVEL: u8 = 0x00;

/// level bookkeeping stops here; derivation itself continues
pub const MAX_LEVEL: u8 = 0xff;

/// validated 32-byte seed carrying the protocol sentinel
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DerivationSeed([u8; SEED_LEN]);

/// check length and sentinel of a raw seed buffer
pub fn validate_seed(bytes: &[u8]) -> Result<()> {
    if bytes.len() != SEED_LEN {
        return Err(Error::InvalidLength { len: bytes.len() });
    }
    if bytes[0] != PROTOCOL_SENTINEL {
        return Err(Error::InvalidSentinel { found: bytes[0] });
    }
    Ok(())
}

impl DerivationSeed {
    /// wrap a 32-byte array, rejecting a wrong sentinel
    pub fn try_new(bytes: [u8; SEED_LEN]) -> Result<Self> {
        validate_seed(&bytes)?;
        Ok(Self(bytes))
    }

    /// copy a seed out of an arbitrary buffer
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        validate_seed(bytes)?;
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(bytes);
        Ok(Self(seed))
    }

    /// re-tag a raw digest as the child of a seed at `parent_level`
    pub(crate) fn from_digest(mut digest: [u8; SEED_LEN], parent_level: u8) -> Self {
        digest[0] = PROTOCOL_SENTINEL;
        digest[1] = parent_level.saturating_add(1);
        Self(digest)
    }

    /// fresh random root seed (sentinel set, level 0)
    pub fn random_root<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SEED_LEN];
        rng.fill_bytes(&mut bytes);
        bytes[0] = PROTOCOL_SENTINEL;
        bytes[1] = ROOT_LEVEL;
        Self(bytes)
    }

    /// fresh random root seed from the thread rng
    pub fn generate_root() -> Self {
        Self::random_root(&mut rand::thread_rng())
    }

    /// number of derivation steps since the root
    pub fn level(&self) -> u8 {
        self.0[1]
    }

    pub fn is_root(&self) -> bool {
        self.level() == ROOT_LEVEL
    }

    /// fail unless this seed is at the root level
    pub fn ensure_root(&self) -> Result<()> {
        if !self.is_root() {
            return Err(Error::NotRootSeed { level: self.level() });
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// derive a single child seed with sha-256
    pub fn derive(&self, salt: &Salt) -> Self {
        Deriver::sha256().derive(self, salt)
    }

    /// fold an ordered list of salts through [`DerivationSeed::derive`]
    pub fn derive_hierarchy<'a>(&self, salts: impl IntoIterator<Item = &'a Salt>) -> Self {
        Deriver::sha256().derive_hierarchy(self, salts)
    }
}

impl AsRef<[u8]> for DerivationSeed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// entropy stays out of logs and panic messages
impl fmt::Debug for DerivationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationSeed")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DerivationSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DerivationSeed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| Error::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<&[u8]> for DerivationSeed {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl Serialize for DerivationSeed {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DerivationSeed {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
