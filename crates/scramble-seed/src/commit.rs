//! commit-reveal protocol between an auditor and a contributor
//!
//! ```text
//!   auditor                         contributor
//!   ───────                         ───────────
//!   root seed (secret)
//!   commitment = derive(root, "commitment")
//!        ──────── commitment ────────▶
//!                                   salt = 64 random chars in '@'..='O'
//!        ◀─────────── salt ───────────
//!   final = derive(root, salt)
//!        ───────── reveal root ──────▶
//!                                   check derive(root, "commitment") == commitment
//! ```
//!
//! the commitment is published before the salt exists and the salt before
//! the root is revealed, so neither side can pick its contribution as a
//! function of the other's.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::salt::Salt;
use crate::seed::{DerivationSeed, SEED_LEN};
use crate::{Error, Result};

/// salt literal the commitment is derived against
pub const COMMITMENT_SALT: &str = "commitment";

/// default length of a contributed salt
pub const CONTRIBUTOR_SALT_LEN: usize = 64;

/// shortest contributor salt accepted, 4 random bits per char
pub const MIN_CONTRIBUTOR_SALT_LEN: usize = 32;

/// protocol settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRevealConfig {
    /// number of characters in a generated contributor salt
    pub contributor_salt_len: usize,
}

impl Default for CommitRevealConfig {
    fn default() -> Self {
        Self {
            contributor_salt_len: CONTRIBUTOR_SALT_LEN,
        }
    }
}

impl CommitRevealConfig {
    pub fn with_contributor_salt_len(mut self, len: usize) -> Self {
        self.contributor_salt_len = len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.contributor_salt_len < MIN_CONTRIBUTOR_SALT_LEN {
            return Err(Error::ContributorSaltTooShort {
                len: self.contributor_salt_len,
                min: MIN_CONTRIBUTOR_SALT_LEN,
            });
        }
        Ok(())
    }
}

/// hash of an uncommitted root seed, published before any salt is known
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Commitment([u8; SEED_LEN]);

impl Commitment {
    /// commit to a root seed
    pub fn for_root(root: &DerivationSeed) -> Self {
        let salt = Salt::from_ascii(COMMITMENT_SALT.to_owned());
        Self(*root.derive(&salt).as_bytes())
    }

    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Commitment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| Error::InvalidHex(e.to_string()))?;
        let bytes: [u8; SEED_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Commitment {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// check a revealed root against a previously published commitment
pub fn verify_commitment(revealed_root: &DerivationSeed, published: &Commitment) -> Result<()> {
    let actual = Commitment::for_root(revealed_root);
    if actual != *published {
        warn!(
            published = %published,
            recomputed = %actual,
            "revealed root seed does not match published commitment"
        );
        return Err(Error::CommitmentMismatch {
            expected: published.to_hex(),
            actual: actual.to_hex(),
        });
    }
    Ok(())
}

/// seed feeding the competition hierarchy
pub fn final_seed(root: &DerivationSeed, contributor_salt: &Salt) -> DerivationSeed {
    root.derive(contributor_salt)
}

/// random printable salt, each char `0x40 | (random & 0x0f)`
pub fn random_contributor_salt<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Salt {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    let text: String = bytes
        .iter()
        .map(|b| char::from(0b0100_0000 | (b & 0b0000_1111)))
        .collect();
    Salt::from_ascii(text)
}

/// public record of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub commitment: Commitment,
    pub contributor_salt: Salt,
    pub root_seed: DerivationSeed,
    pub final_seed: DerivationSeed,
}

impl Transcript {
    /// recompute commitment and final seed from the revealed root
    pub fn verify(&self) -> Result<()> {
        self.root_seed.ensure_root()?;
        verify_commitment(&self.root_seed, &self.commitment)?;

        let recomputed = final_seed(&self.root_seed, &self.contributor_salt);
        if recomputed != self.final_seed {
            warn!(
                commitment = %self.commitment,
                "published final seed does not follow from revealed root"
            );
            return Err(Error::FinalSeedMismatch {
                expected: self.final_seed.to_hex(),
                actual: recomputed.to_hex(),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// auditor-side protocol state for one root seed
///
/// the root never leaves the session before [`Session::reveal`].
#[derive(Debug, Clone)]
pub enum Session {
    Uncommitted {
        root: DerivationSeed,
    },
    Committed {
        root: DerivationSeed,
        commitment: Commitment,
    },
    SaltContributed {
        root: DerivationSeed,
        commitment: Commitment,
        salt: Salt,
    },
    Finalized {
        root: DerivationSeed,
        commitment: Commitment,
        salt: Salt,
        final_seed: DerivationSeed,
    },
    Verified {
        transcript: Transcript,
    },
}

impl Session {
    /// start from an existing root seed (must be level 0)
    pub fn new(root: DerivationSeed) -> Result<Self> {
        root.ensure_root()?;
        Ok(Self::Uncommitted { root })
    }

    /// start from a fresh random root seed
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::Uncommitted {
            root: DerivationSeed::random_root(rng),
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            Self::Uncommitted { .. } => "uncommitted",
            Self::Committed { .. } => "committed",
            Self::SaltContributed { .. } => "salt-contributed",
            Self::Finalized { .. } => "finalized",
            Self::Verified { .. } => "verified",
        }
    }

    pub fn commitment(&self) -> Option<Commitment> {
        match self {
            Self::Uncommitted { .. } => None,
            Self::Committed { commitment, .. }
            | Self::SaltContributed { commitment, .. }
            | Self::Finalized { commitment, .. } => Some(*commitment),
            Self::Verified { transcript } => Some(transcript.commitment),
        }
    }

    pub fn contributor_salt(&self) -> Option<&Salt> {
        match self {
            Self::SaltContributed { salt, .. } | Self::Finalized { salt, .. } => Some(salt),
            Self::Verified { transcript } => Some(&transcript.contributor_salt),
            _ => None,
        }
    }

    pub fn final_seed(&self) -> Option<DerivationSeed> {
        match self {
            Self::Finalized { final_seed, .. } => Some(*final_seed),
            Self::Verified { transcript } => Some(transcript.final_seed),
            _ => None,
        }
    }

    /// uncommitted → committed; returns the commitment to publish
    pub fn commit(&mut self) -> Result<Commitment> {
        let Self::Uncommitted { root } = self else {
            return Err(self.invalid("commit"));
        };
        let root = *root;
        let commitment = Commitment::for_root(&root);
        *self = Self::Committed { root, commitment };
        info!(commitment = %commitment, "root seed committed");
        Ok(commitment)
    }

    /// committed → salt-contributed
    pub fn contribute(&mut self, salt: Salt) -> Result<()> {
        let Self::Committed { root, commitment } = self else {
            return Err(self.invalid("contribute"));
        };
        debug!(commitment = %commitment, salt = %salt, "contributor salt received");
        *self = Self::SaltContributed {
            root: *root,
            commitment: *commitment,
            salt,
        };
        Ok(())
    }

    /// salt-contributed → finalized; returns the final seed
    pub fn finalize(&mut self) -> Result<DerivationSeed> {
        let Self::SaltContributed {
            root,
            commitment,
            salt,
        } = self
        else {
            return Err(self.invalid("finalize"));
        };
        let seed = final_seed(root, salt);
        debug!(commitment = %commitment, level = seed.level(), "final seed derived");
        *self = Self::Finalized {
            root: *root,
            commitment: *commitment,
            salt: salt.clone(),
            final_seed: seed,
        };
        Ok(seed)
    }

    /// finalized → verified; publishes the root inside a checked transcript
    pub fn reveal(&mut self) -> Result<Transcript> {
        let Self::Finalized {
            root,
            commitment,
            salt,
            final_seed,
        } = self
        else {
            return Err(self.invalid("reveal"));
        };
        let transcript = Transcript {
            commitment: *commitment,
            contributor_salt: salt.clone(),
            root_seed: *root,
            final_seed: *final_seed,
        };
        transcript.verify()?;
        info!(commitment = %transcript.commitment, "root seed revealed");
        *self = Self::Verified {
            transcript: transcript.clone(),
        };
        Ok(transcript)
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            state: self.state(),
            action,
        }
    }
}

/// contributor-side view: the commitment it saw and the salt it published
#[derive(Debug, Clone)]
pub struct Contributor {
    commitment: Commitment,
    salt: Salt,
}

impl Contributor {
    /// answer a published commitment with a fresh salt
    pub fn respond<R: RngCore + CryptoRng>(
        commitment: Commitment,
        rng: &mut R,
        config: &CommitRevealConfig,
    ) -> Result<Self> {
        config.validate()?;
        let salt = random_contributor_salt(rng, config.contributor_salt_len);
        debug!(commitment = %commitment, "contributor salt generated");
        Ok(Self { commitment, salt })
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// check a revealed transcript against what this contributor observed
    pub fn audit(&self, transcript: &Transcript) -> Result<DerivationSeed> {
        if transcript.commitment != self.commitment {
            warn!(
                observed = %self.commitment,
                published = %transcript.commitment,
                "transcript carries a different commitment"
            );
            return Err(Error::CommitmentMismatch {
                expected: self.commitment.to_hex(),
                actual: transcript.commitment.to_hex(),
            });
        }
        if transcript.contributor_salt != self.salt {
            warn!(commitment = %self.commitment, "transcript carries a different salt");
            return Err(Error::SaltMismatch);
        }
        transcript.verify()?;
        Ok(transcript.final_seed)
    }
}
