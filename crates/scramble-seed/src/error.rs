//! error types for scramble-seed

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // === validation errors ===
    #[error("invalid derivation seed length: {len} bytes (expected 32)")]
    InvalidLength { len: usize },

    #[error("invalid protocol sentinel: 0x{found:02x} (expected 0x67)")]
    InvalidSentinel { found: u8 },

    #[error("salt is not ascii: byte 0x{byte:02x} at index {index}")]
    NonAsciiSalt { index: usize, byte: u8 },

    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    #[error("empty salt values are not allowed in a textual path")]
    EmptySalt,

    #[error("salt contains the path separator '/'")]
    SaltContainsSeparator,

    #[error("root derivation seed must be at level 0, saw level {level}")]
    NotRootSeed { level: u8 },

    #[error("expected derivation level {expected}, saw {actual}")]
    UnexpectedLevel { expected: u8, actual: u8 },

    #[error("mismatched subevent in second-to-last level of hierarchy: expected {expected}, found {found}")]
    SubeventMismatch { expected: String, found: String },

    // === commit-reveal errors ===
    #[error("commitment mismatch: published {expected}, recomputed {actual}")]
    CommitmentMismatch { expected: String, actual: String },

    #[error("final seed mismatch: published {expected}, recomputed {actual}")]
    FinalSeedMismatch { expected: String, actual: String },

    #[error("contributor salt of {len} chars is too short (minimum {min})")]
    ContributorSaltTooShort { len: usize, min: usize },

    #[error("contributed salt does not match the salt that was published")]
    SaltMismatch,

    #[error("invalid transition: cannot {action} in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    // === sharding errors ===
    #[error("incomplete share set: have {have}, need {need}")]
    IncompleteShareSet { have: usize, need: usize },

    #[error("no shares provided")]
    NoShares,

    #[error("share count must be at least 1")]
    InvalidShareCount,

    #[error("shard file line {line}: {reason}")]
    InvalidShardLine { line: usize, reason: String },

    // === registry errors ===
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("event {0} does not have a single scramble generator")]
    NotMonoscramble(String),

    #[error("scramble generator delegation cycle at event {0}")]
    DelegationCycle(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // === external errors ===
    #[error("scramble generator failed: {0}")]
    Generator(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
