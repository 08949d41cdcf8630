//! # scramble-seed
//!
//! unpredictable-but-auditable seed material for competition scrambles.
//!
//! ## architecture
//!
//! ```text
//!   ┌──────────────┐   xor shards   ┌────────────────┐
//!   │  root seed   │ ─────────────▶ │  shard file    │  (1024 x 32 bytes)
//!   │  67 00 ....  │ ◀───────────── │  hex per line  │
//!   └──────┬───────┘                └────────────────┘
//!          │ derive(root, "commitment")  ──▶ published commitment
//!          │ derive(root, contributor salt)
//!          ▼
//!   ┌──────────────┐
//!   │  final seed  │  level 1
//!   └──────┬───────┘
//!          │ derive_hierarchy(scrambles/333/r1/g1/a1/333/sub1)
//!          ▼
//!   ┌──────────────┐
//!   │  leaf seed   │  level 9 ──▶ scramble generator
//!   └──────────────┘
//! ```
//!
//! ## properties
//!
//! - each step is `sha256(parent || sha256(salt))`, re-tagged with the
//!   0x67 sentinel and a saturating level byte
//! - any change to a salt, its position, or the path length gives an
//!   unrelated leaf
//! - the commitment is fixed before the contributor salt exists, so
//!   neither party alone controls the final seed
//! - shards only spread the secret; all of them are required and none
//!   are integrity-checked
//!
//! ## usage
//!
//! ```rust,ignore
//! use scramble_seed::{Session, Contributor, CommitRevealConfig};
//!
//! let mut rng = rand::thread_rng();
//! let mut session = Session::generate(&mut rng);
//! let commitment = session.commit()?;
//!
//! // ... publish commitment, receive salt ...
//! let contributor = Contributor::respond(commitment, &mut rng, &CommitRevealConfig::default())?;
//! session.contribute(contributor.salt().clone())?;
//! let competition_seed = session.finalize()?;
//!
//! let round_seed = competition_seed.derive_hierarchy(&"scrambles/333/r1".parse()?);
//!
//! // later: reveal and let anyone check
//! let transcript = session.reveal()?;
//! contributor.audit(&transcript)?;
//! ```

pub mod commit;
pub mod derive;
pub mod error;
pub mod registry;
pub mod rng;
pub mod salt;
pub mod scramble;
pub mod seed;
pub mod shard;

pub use commit::{
    final_seed, random_contributor_salt, verify_commitment, CommitRevealConfig, Commitment,
    Contributor, Session, Transcript, COMMITMENT_SALT, CONTRIBUTOR_SALT_LEN,
    MIN_CONTRIBUTOR_SALT_LEN,
};
pub use derive::{derive, derive_hierarchy, validate, Deriver, HashProvider, Sha256Provider};
pub use error::{Error, Result};
pub use registry::{EventId, EventRegistry, EventSpec, SubeventEntry};
pub use rng::SeedRng;
pub use salt::{DerivationPath, Salt};
pub use scramble::{
    derive_scramble_for_event, derive_scramble_with_registry, leaf_seed_for_event,
    ScrambleGenerator, SCRAMBLE_DERIVATION_LEVEL,
};
pub use seed::{DerivationSeed, PROTOCOL_SENTINEL, SEED_LEN};
pub use shard::{
    combine_seed, decode_shard_file, encode_shard_file, from_shares, from_shares_checked,
    read_shard_file, split_seed, to_shares, write_shard_file, SecretShare, ShardConfig,
};
