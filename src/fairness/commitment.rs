//! Commitment Store
//!
//! Holds one record per roll session: the secret server seed, the public
//! nonce, and the hash published at commit time. Records are never
//! deleted; a buyer may ask for the reveal long after the roll, and the
//! audit trail is the point of the protocol. Storage is process-lifetime
//! only — losing commitments on restart is a stated limitation, surfaced
//! to callers as `NotFound`.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::entropy::{random_bytes, random_hex};
use crate::core::hash::sha256_hex;

use super::derive::derive_index;

/// Byte length of the secret server seed.
pub const SERVER_SEED_LEN: usize = 32;
/// Byte length of the commitment id.
pub const COMMIT_ID_LEN: usize = 16;
/// Byte length of the public nonce.
pub const NONCE_LEN: usize = 8;

/// Secret server seed for one commitment.
///
/// Kept out of `Debug`/log output on purpose: the seed must never be
/// disclosed before reveal.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSeed([u8; SERVER_SEED_LEN]);

impl ServerSeed {
    /// Generate a fresh seed from the OS CSPRNG.
    pub fn generate() -> Self {
        Self(random_bytes())
    }

    /// Raw seed bytes (HMAC key for derivation).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding — the form that is hashed at commit time
    /// and disclosed at reveal.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Commitment hash: SHA-256 over the hex encoding of the seed.
    ///
    /// Hashing the hex string (rather than the raw bytes) means a
    /// verifier needs nothing but the revealed string and any SHA-256
    /// tool.
    pub fn commitment_hash(&self) -> String {
        sha256_hex(self.to_hex().as_bytes())
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSeed(<redacted>)")
    }
}

/// One roll session's commitment record.
#[derive(Debug)]
struct CommitRecord {
    seed: ServerSeed,
    nonce: String,
    hash: String,
    /// Records that an index has been derived. Does NOT guard against
    /// re-resolution; see [`CommitmentStore::resolve`].
    used: bool,
}

/// Non-secret fields returned at commit time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTicket {
    /// Caller-facing handle for the roll session.
    pub id: String,
    /// Public per-commitment randomness, hex encoded.
    pub nonce: String,
    /// SHA-256 of the (still secret) server seed's hex encoding.
    pub hash: String,
}

/// Result of resolving a roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Derived index in `[0, n)`.
    pub index: u64,
    /// The commitment hash, echoed for client-side bookkeeping.
    pub hash: String,
    /// The nonce the derivation was bound to.
    pub nonce: String,
}

/// Everything a third party needs to audit a roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCommitment {
    /// The formerly secret seed, hex encoded.
    pub server_seed: String,
    /// Public nonce, hex encoded.
    pub nonce: String,
    /// The hash published at commit time.
    pub hash: String,
}

/// Fairness engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FairnessError {
    /// Commitment id was never issued, or the store was cleared by a
    /// process restart.
    #[error("unknown commitment id")]
    NotFound,
}

/// Lock-guarded, process-lifetime store of commitments.
///
/// All check-then-mutate sequences run under a single store-wide lock;
/// contention is low (one short map operation per request) so per-id
/// locking would buy nothing.
#[derive(Debug, Default)]
pub struct CommitmentStore {
    commits: Mutex<HashMap<String, CommitRecord>>,
}

impl CommitmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh commitment and return its non-secret fields.
    ///
    /// The server seed stays inside the store until [`reveal`]; it is
    /// never logged.
    ///
    /// [`reveal`]: CommitmentStore::reveal
    pub fn create(&self) -> CommitTicket {
        let id = random_hex(COMMIT_ID_LEN);
        let seed = ServerSeed::generate();
        let nonce = random_hex(NONCE_LEN);
        let hash = seed.commitment_hash();

        let ticket = CommitTicket {
            id: id.clone(),
            nonce: nonce.clone(),
            hash: hash.clone(),
        };

        self.commits.lock().insert(
            id.clone(),
            CommitRecord {
                seed,
                nonce,
                hash,
                used: false,
            },
        );

        debug!(commit_id = %id, "created commitment");
        ticket
    }

    /// Derive the roll index for a commitment.
    ///
    /// The first successful call flips the record's `used` flag. Calling
    /// again with the same inputs recomputes the same deterministic
    /// outcome without erroring or mutating anything further — retrying
    /// after a dropped connection cannot change a roll. The `used` flag
    /// records "has been resolved" and is deliberately not a replay
    /// guard.
    pub fn resolve(
        &self,
        id: &str,
        client_seed: &str,
        n: u64,
    ) -> Result<RollOutcome, FairnessError> {
        let mut commits = self.commits.lock();
        let rec = commits.get_mut(id).ok_or(FairnessError::NotFound)?;

        let index = derive_index(rec.seed.as_bytes(), client_seed, &rec.nonce, n);
        if !rec.used {
            rec.used = true;
            debug!(commit_id = %id, index, n, "resolved roll");
        }

        Ok(RollOutcome {
            index,
            hash: rec.hash.clone(),
            nonce: rec.nonce.clone(),
        })
    }

    /// Disclose the server seed for public verification.
    ///
    /// No mutation; may be called before or after [`resolve`]. Revealing
    /// before resolution voids the commitment's usefulness for the
    /// operator, not for the verifier.
    ///
    /// [`resolve`]: CommitmentStore::resolve
    pub fn reveal(&self, id: &str) -> Result<RevealedCommitment, FairnessError> {
        let commits = self.commits.lock();
        let rec = commits.get(id).ok_or(FairnessError::NotFound)?;
        Ok(RevealedCommitment {
            server_seed: rec.seed.to_hex(),
            nonce: rec.nonce.clone(),
            hash: rec.hash.clone(),
        })
    }

    /// Number of stored commitments.
    pub fn len(&self) -> usize {
        self.commits.lock().len()
    }

    /// Whether the store holds no commitments.
    pub fn is_empty(&self) -> bool {
        self.commits.lock().is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::sha256_hex;
    use crate::fairness::derive::verify_reveal;

    #[test]
    fn test_create_shapes() {
        let store = CommitmentStore::new();
        let ticket = store.create();

        assert_eq!(ticket.id.len(), COMMIT_ID_LEN * 2);
        assert_eq!(ticket.nonce.len(), NONCE_LEN * 2);
        assert_eq!(ticket.hash.len(), 64);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_hash_matches_seed_before_and_after_reveal() {
        let store = CommitmentStore::new();
        let ticket = store.create();

        let reveal = store.reveal(&ticket.id).unwrap();
        assert_eq!(reveal.hash, ticket.hash);
        assert_eq!(sha256_hex(reveal.server_seed.as_bytes()), ticket.hash);

        // Resolving afterwards must not change what reveal reports.
        store.resolve(&ticket.id, "seed", 5).unwrap();
        let again = store.reveal(&ticket.id).unwrap();
        assert_eq!(again.server_seed, reveal.server_seed);
        assert_eq!(sha256_hex(again.server_seed.as_bytes()), ticket.hash);
    }

    #[test]
    fn test_resolve_unknown_id() {
        let store = CommitmentStore::new();
        assert_eq!(
            store.resolve("feedface", "seed", 10),
            Err(FairnessError::NotFound)
        );
        assert_eq!(store.reveal("feedface"), Err(FairnessError::NotFound));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let store = CommitmentStore::new();
        let ticket = store.create();

        let first = store.resolve(&ticket.id, "abc", 10).unwrap();
        let second = store.resolve(&ticket.id, "abc", 10).unwrap();

        assert!(first.index < 10);
        assert_eq!(first.index, second.index);
        assert_eq!(first.nonce, second.nonce);
        assert_eq!(first.hash, second.hash);
    }

    #[test]
    fn test_commit_resolve_reveal_scenario() {
        // The full fairness contract from the buyer's point of view.
        let store = CommitmentStore::new();
        let ticket = store.create();

        let outcome = store.resolve(&ticket.id, "abc", 10).unwrap();
        assert!(outcome.index < 10);
        assert_eq!(outcome.nonce, ticket.nonce);
        assert_eq!(outcome.hash, ticket.hash);

        let reveal = store.reveal(&ticket.id).unwrap();
        assert!(verify_reveal(&reveal, "abc", 10, outcome.index));
    }

    #[test]
    fn test_distinct_commitments_are_independent() {
        let store = CommitmentStore::new();
        let a = store.create();
        let b = store.create();

        assert_ne!(a.id, b.id);
        assert_ne!(a.hash, b.hash);

        let ra = store.reveal(&a.id).unwrap();
        let rb = store.reveal(&b.id).unwrap();
        assert_ne!(ra.server_seed, rb.server_seed);
    }

    #[test]
    fn test_server_seed_debug_is_redacted() {
        let seed = ServerSeed::generate();
        let rendered = format!("{seed:?}");
        assert_eq!(rendered, "ServerSeed(<redacted>)");
        assert!(!rendered.contains(&seed.to_hex()));
    }
}
