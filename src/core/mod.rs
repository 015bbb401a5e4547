//! Core primitives.
//!
//! Small, shared building blocks for the fairness engine and the shop
//! stores: OS-sourced randomness and SHA-256 / HMAC-SHA256 helpers.
//! Nothing in here holds state.

pub mod entropy;
pub mod hash;

// Re-export core helpers
pub use entropy::{random_bytes, random_hex};
pub use hash::{hmac_sha256, sha256, sha256_hex, Digest32};
