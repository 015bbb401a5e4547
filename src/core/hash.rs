//! Hashing Primitives
//!
//! SHA-256 helpers for commitment digests plus an HMAC-SHA256 (RFC 2104)
//! used to derive roll indexes. Both are pure functions: identical inputs
//! always produce identical output, which is what makes the fairness
//! protocol third-party verifiable.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// SHA-256 of arbitrary bytes.
pub fn sha256(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of arbitrary bytes, lowercase hex encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// HMAC-SHA256 (RFC 2104).
///
/// Keys longer than the 64-byte SHA-256 block are hashed down first;
/// shorter keys are zero-padded, per the RFC.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Digest32 {
    const BLOCK_SIZE: usize = 64;

    let mut k_padded = [0u8; BLOCK_SIZE];
    if key.len() <= BLOCK_SIZE {
        k_padded[..key.len()].copy_from_slice(key);
    } else {
        let hashed = sha256(key);
        k_padded[..32].copy_from_slice(&hashed);
    }

    let mut inner_pad = [0x36u8; BLOCK_SIZE];
    let mut outer_pad = [0x5cu8; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        inner_pad[i] ^= k_padded[i];
        outer_pad[i] ^= k_padded[i];
    }

    // H(K XOR ipad || message)
    let mut inner_hasher = Sha256::new();
    inner_hasher.update(inner_pad);
    inner_hasher.update(message);
    let inner_hash = inner_hasher.finalize();

    // H(K XOR opad || inner_hash)
    let mut outer_hasher = Sha256::new();
    outer_hasher.update(outer_pad);
    outer_hasher.update(inner_hash);
    outer_hasher.finalize().into()
}

// =============================================================================
// TESTS
// =============================================================================
