//! Inventory Ledger
//!
//! Per-artwork stock counters with one rule: stock only ever decreases,
//! never below zero, by exactly one per successful sale. Both the direct
//! "buy now" path and the payment-confirmation path go through the same
//! [`reserve`] operation, so the last unit of a piece can never be sold
//! twice no matter how requests race.
//!
//! [`reserve`]: InventoryLedger::reserve

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::catalog::{Artwork, Catalog};
use super::entitlement::EntitlementStore;

/// Units of each artwork available at process start.
pub const DEFAULT_STOCK_PER_ARTWORK: u32 = 1;

/// Read-only aggregate over the whole ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Total units the process started with.
    pub total: u32,
    /// Artworks with at least one unit left.
    pub available: u32,
    /// Artworks with no units left.
    pub sold: u32,
    /// Ids of available artworks, in catalog order.
    pub available_ids: Vec<String>,
}

/// Purchase failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    /// The id is not in the catalog.
    #[error("artwork not found")]
    NotFound,
    /// Valid artwork, zero stock. A definitive outcome, not retryable.
    #[error("artwork out of stock")]
    OutOfStock,
}

/// Stock ledger over a catalog, minting entitlement tokens on sale.
#[derive(Debug)]
pub struct InventoryLedger {
    catalog: Arc<Catalog>,
    tokens: Arc<EntitlementStore>,
    initial_stock: u32,
    stock: Mutex<HashMap<String, u32>>,
}

impl InventoryLedger {
    /// Build a ledger with [`DEFAULT_STOCK_PER_ARTWORK`] units per piece.
    pub fn new(catalog: Arc<Catalog>, tokens: Arc<EntitlementStore>) -> Self {
        Self::with_stock(catalog, tokens, DEFAULT_STOCK_PER_ARTWORK)
    }

    /// Build a ledger with a custom per-piece unit count.
    pub fn with_stock(
        catalog: Arc<Catalog>,
        tokens: Arc<EntitlementStore>,
        units_per_artwork: u32,
    ) -> Self {
        let stock = catalog
            .iter()
            .map(|art| (art.id.clone(), units_per_artwork))
            .collect();
        Self {
            catalog,
            tokens,
            initial_stock: units_per_artwork,
            stock: Mutex::new(stock),
        }
    }

    /// Read-only snapshot of totals and availability.
    pub fn summary(&self) -> InventorySummary {
        let stock = self.stock.lock();
        let total = self.initial_stock * self.catalog.len() as u32;

        let mut available_ids = Vec::new();
        for art in self.catalog.iter() {
            if stock.get(&art.id).copied().unwrap_or(0) > 0 {
                available_ids.push(art.id.clone());
            }
        }

        let available = available_ids.len() as u32;
        InventorySummary {
            total,
            available,
            sold: self.catalog.len() as u32 - available,
            available_ids,
        }
    }

    /// Sell one unit: decrement stock and mint an entitlement token, as
    /// one atomic step.
    ///
    /// The stock lock is held across the mint, so either both happen or
    /// neither does. Concurrent calls against the last unit serialize
    /// here; exactly one wins, the rest get [`PurchaseError::OutOfStock`].
    pub fn reserve(&self, artwork_id: &str) -> Result<String, PurchaseError> {
        let mut stock = self.stock.lock();
        let remaining = stock.get_mut(artwork_id).ok_or(PurchaseError::NotFound)?;
        if *remaining == 0 {
            return Err(PurchaseError::OutOfStock);
        }
        *remaining -= 1;
        let token = self.tokens.mint(artwork_id);

        info!(artwork_id, remaining = *remaining, "reserved one unit");
        Ok(token)
    }

    /// Catalog lookup, used to resolve metadata for delivery.
    pub fn artwork(&self, artwork_id: &str) -> Option<&Artwork> {
        self.catalog.get(artwork_id)
    }

    /// Units left for one artwork; `None` for unknown ids.
    pub fn remaining(&self, artwork_id: &str) -> Option<u32> {
        self.stock.lock().get(artwork_id).copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
