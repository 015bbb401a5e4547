//! Shop State
//!
//! The sale side of the system: the static artwork catalog, the inventory
//! ledger that enforces exactly-once sale per piece, and the entitlement
//! token store that turns a completed purchase into a time- and
//! use-limited download right.
//!
//! ## Module Structure
//!
//! - `catalog`: read-only artwork metadata
//! - `inventory`: per-artwork stock, atomic reserve
//! - `entitlement`: download tokens and the pending-claim bridge

pub mod catalog;
pub mod entitlement;
pub mod inventory;

// Re-export key types
pub use catalog::{Artwork, ArtworkSize, Catalog};
pub use entitlement::{EntitlementConfig, EntitlementStore, PendingClaim};
pub use inventory::{InventoryLedger, InventorySummary, PurchaseError};
