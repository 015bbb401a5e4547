//! Service Layer
//!
//! Thin glue the transport layer calls into. Everything stateful lives in
//! `fairness` and `shop`; this layer validates inputs, unifies errors,
//! and assembles downloads. It holds no invariants of its own.
//!
//! ## Module Structure
//!
//! - `assets`: byte retrieval behind the [`AssetStore`] seam
//! - `shop`: the [`DropService`] facade, one method per capability

pub mod assets;
pub mod shop;

// Re-export key types
pub use assets::{mime_for_path, AssetStore, FsAssetStore, MemoryAssetStore};
pub use shop::{Download, DropService, ServiceError};
