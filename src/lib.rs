//! # Fortune Drop Server
//!
//! Provably-fair artwork drops with strictly limited inventory and
//! single-use download entitlements.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   FORTUNE DROP SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Stateless primitives                    │
//! │  ├── entropy.rs   - OS CSPRNG for seeds, nonces, ids         │
//! │  └── hash.rs      - SHA-256 + HMAC-SHA256                    │
//! │                                                              │
//! │  fairness/        - Commit-reveal roll protocol              │
//! │  ├── commitment.rs- Commitment records and store             │
//! │  └── derive.rs    - Pure index derivation + verification     │
//! │                                                              │
//! │  shop/            - Sale state                               │
//! │  ├── catalog.rs   - Read-only artwork metadata               │
//! │  ├── inventory.rs - Stock ledger, atomic reserve             │
//! │  └── entitlement.rs- Download tokens, pending claims         │
//! │                                                              │
//! │  service/         - Glue for the transport layer             │
//! │  ├── assets.rs    - Byte retrieval behind a trait            │
//! │  └── shop.rs      - DropService capability facade            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fairness Guarantee
//!
//! A roll is derived from a server seed committed to (by hash) before the
//! client seed exists, so the operator cannot steer the outcome without
//! detection. After the roll the seed is revealed and anyone can recompute
//! both the hash and the index; see [`fairness::verify_reveal`].
//!
//! What the protocol does not cover: an operator who controls the process
//! can refuse to reveal. It proves tampering, it cannot compel honesty.
//!
//! ## State Model
//!
//! All three stores are in-memory and process-lifetime; a restart loses
//! commitments, stock counters, and tokens. That is an accepted
//! limitation of this deployment, not a recoverable fault.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod fairness;
pub mod service;
pub mod shop;

// Re-export commonly used types
pub use fairness::{CommitTicket, CommitmentStore, RevealedCommitment, RollOutcome};
pub use service::{DropService, ServiceError};
pub use shop::{Catalog, EntitlementStore, InventoryLedger, InventorySummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
