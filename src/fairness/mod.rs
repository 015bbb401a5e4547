//! Fairness Engine
//!
//! Commit-reveal protocol for provably unbiased rolls.
//!
//! The server commits to a secret seed by publishing its hash and a public
//! nonce before the client's seed is known. The roll index is derived from
//! both seeds, so neither party alone controls the outcome. After the roll
//! the server reveals the seed, and anyone can recompute the hash and the
//! index to confirm nothing was swapped after the fact.
//!
//! What this protects against: undetectable after-the-fact tampering by
//! the operator. What it does not protect against: an operator who simply
//! refuses to reveal.
//!
//! ## Module Structure
//!
//! - `commitment`: commitment records and the lock-guarded store
//! - `derive`: pure index derivation and third-party verification

pub mod commitment;
pub mod derive;

// Re-export key types
pub use commitment::{
    CommitTicket, CommitmentStore, FairnessError, RevealedCommitment, RollOutcome, ServerSeed,
};
pub use derive::{derive_index, verify_reveal};
