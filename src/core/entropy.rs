//! Secure Randomness
//!
//! All unguessable values in the system — commitment ids, server seeds,
//! nonces — come from the operating system's CSPRNG via this module.
//! Entitlement token ids use UUID v4 and are generated where they are
//! minted.
//!
//! This is deliberately the opposite of a deterministic PRNG: a server
//! seed that could be predicted from earlier output would let a client
//! steer the roll.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a fixed-size array with bytes from the OS CSPRNG.
///
/// # Example
///
/// ```
/// use fortune_drop::core::entropy::random_bytes;
///
/// let seed: [u8; 32] = random_bytes();
/// let other: [u8; 32] = random_bytes();
/// assert_ne!(seed, other);
/// ```
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generate `n_bytes` of OS randomness, lowercase hex encoded.
///
/// The returned string is `2 * n_bytes` characters long. Used for
/// caller-facing identifiers (commitment ids, nonces).
pub fn random_hex(n_bytes: usize) -> String {
    let mut buf = vec![0u8; n_bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

// =============================================================================
// TESTS
// =============================================================================
