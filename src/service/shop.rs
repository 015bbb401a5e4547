//! Drop Service Facade
//!
//! One struct wiring the commitment store, the inventory ledger, the
//! entitlement store, and the asset store together, with one method per
//! capability the transport layer exposes: fairness, inventory read,
//! purchase, claim, delivery.

use std::io;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::fairness::{CommitTicket, CommitmentStore, FairnessError, RevealedCommitment, RollOutcome};
use crate::shop::{
    Catalog, EntitlementConfig, EntitlementStore, InventoryLedger, InventorySummary, PendingClaim,
    PurchaseError,
};

use super::assets::{mime_for_path, AssetStore};

/// Errors the facade surfaces to the transport layer.
///
/// All are definitive outcomes for the end user ("no longer available",
/// "link expired") — none are system-retryable. The pending-claim "not
/// ready yet" case is deliberately NOT here; [`DropService::claim`]
/// returns `None` for it and callers poll.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed request parameters.
    #[error("bad input: {0}")]
    BadInput(&'static str),
    /// Unknown commitment or artwork id.
    #[error("not found")]
    NotFound,
    /// Valid artwork, zero stock.
    #[error("out of stock")]
    OutOfStock,
    /// Download token unknown, expired, or exhausted — deliberately not
    /// distinguished, so probing clients learn nothing.
    #[error("invalid or expired token")]
    InvalidToken,
    /// Asset bytes could not be read.
    #[error("asset retrieval failed")]
    Asset(#[from] io::Error),
}

impl From<FairnessError> for ServiceError {
    fn from(err: FairnessError) -> Self {
        match err {
            FairnessError::NotFound => Self::NotFound,
        }
    }
}

impl From<PurchaseError> for ServiceError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::NotFound => Self::NotFound,
            PurchaseError::OutOfStock => Self::OutOfStock,
        }
    }
}

/// A fully resolved download, ready to hand to the transport layer.
#[derive(Clone, Debug, Serialize)]
pub struct Download {
    /// The artwork the spent token authorized.
    pub artwork_id: String,
    /// Suggested attachment filename.
    pub file_name: String,
    /// MIME type by delivery-path extension.
    pub mime: &'static str,
    /// The asset bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// The drop server's capability surface.
pub struct DropService {
    fairness: CommitmentStore,
    ledger: InventoryLedger,
    tokens: Arc<EntitlementStore>,
    assets: Box<dyn AssetStore>,
}

impl DropService {
    /// Wire up a service over a catalog and an asset store, with the
    /// default entitlement policy.
    pub fn new(catalog: Catalog, assets: Box<dyn AssetStore>) -> Self {
        Self::with_entitlement_config(catalog, assets, EntitlementConfig::default())
    }

    /// Wire up a service with a custom entitlement policy.
    pub fn with_entitlement_config(
        catalog: Catalog,
        assets: Box<dyn AssetStore>,
        config: EntitlementConfig,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let tokens = Arc::new(EntitlementStore::with_config(config));
        let ledger = InventoryLedger::new(Arc::clone(&catalog), Arc::clone(&tokens));
        Self {
            fairness: CommitmentStore::new(),
            ledger,
            tokens,
            assets,
        }
    }

    // ------------------------------------------------------------------
    // Fairness
    // ------------------------------------------------------------------

    /// Open a roll session: commit to a fresh server seed.
    pub fn commit(&self) -> CommitTicket {
        self.fairness.create()
    }

    /// Resolve a roll with the client's seed over `n` slots.
    ///
    /// Idempotent per commitment id; see
    /// [`CommitmentStore::resolve`](crate::fairness::CommitmentStore::resolve).
    pub fn resolve_roll(
        &self,
        id: &str,
        client_seed: &str,
        n: u64,
    ) -> Result<RollOutcome, ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::BadInput("missing commitment id"));
        }
        if client_seed.is_empty() {
            return Err(ServiceError::BadInput("missing client seed"));
        }
        if n == 0 {
            return Err(ServiceError::BadInput("slot count must be positive"));
        }
        Ok(self.fairness.resolve(id, client_seed, n)?)
    }

    /// Disclose a commitment's server seed for verification.
    pub fn reveal(&self, id: &str) -> Result<RevealedCommitment, ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::BadInput("missing commitment id"));
        }
        Ok(self.fairness.reveal(id)?)
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    /// Stock snapshot for the storefront.
    pub fn inventory(&self) -> InventorySummary {
        self.ledger.summary()
    }

    // ------------------------------------------------------------------
    // Purchase
    // ------------------------------------------------------------------

    /// Direct purchase: reserve one unit and return the download token.
    pub fn buy_now(&self, artwork_id: &str) -> Result<String, ServiceError> {
        if artwork_id.is_empty() {
            return Err(ServiceError::BadInput("missing artwork id"));
        }
        let token = self.ledger.reserve(artwork_id)?;
        info!(artwork_id, "direct purchase completed");
        Ok(token)
    }

    /// Payment-provider confirmation: reserve and park the token for the
    /// buyer's session to claim.
    ///
    /// The error is returned so the transport layer can decide whether to
    /// acknowledge the callback regardless (a confirmation for a piece
    /// that sold out in the meantime is the operator's problem to refund,
    /// not the provider's to retry).
    pub fn payment_confirmed(
        &self,
        session_id: &str,
        artwork_id: &str,
    ) -> Result<(), ServiceError> {
        if session_id.is_empty() {
            return Err(ServiceError::BadInput("missing session id"));
        }
        if artwork_id.is_empty() {
            return Err(ServiceError::BadInput("missing artwork id"));
        }
        match self.ledger.reserve(artwork_id) {
            Ok(token) => {
                self.tokens.put_pending_claim(session_id, &token, artwork_id);
                info!(session_id, artwork_id, "confirmed payment, claim parked");
                Ok(())
            }
            Err(err) => {
                warn!(session_id, artwork_id, %err, "payment confirmed but reserve failed");
                Err(err.into())
            }
        }
    }

    /// Poll for the token minted by an asynchronous confirmation.
    ///
    /// `None` means "not ready yet"; each session yields its claim at
    /// most once.
    pub fn claim(&self, session_id: &str) -> Option<PendingClaim> {
        self.tokens.take_pending_claim(session_id)
    }

    // ------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------

    /// Spend one token use and return the artwork bytes.
    ///
    /// The token is consumed before any I/O; asset reads happen outside
    /// every store lock.
    pub fn download(&self, token: &str) -> Result<Download, ServiceError> {
        if token.is_empty() {
            return Err(ServiceError::BadInput("missing token"));
        }
        let artwork_id = self
            .tokens
            .consume(token)
            .ok_or(ServiceError::InvalidToken)?;
        let artwork = self
            .ledger
            .artwork(&artwork_id)
            .ok_or(ServiceError::NotFound)?;

        let path = artwork.delivery_path().to_string();
        let mime = mime_for_path(&path);
        let ext = std::path::Path::new(&path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let file_name = format!("{artwork_id}.{ext}");

        let bytes = self.assets.read(&path)?;
        info!(%artwork_id, size = bytes.len(), "served download");

        Ok(Download {
            artwork_id,
            file_name,
            mime,
            bytes,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::verify_reveal;
    use crate::service::assets::MemoryAssetStore;

    fn demo_service() -> DropService {
        let catalog = Catalog::demo();
        let mut assets = MemoryAssetStore::new();
        for art in catalog.iter() {
            assets.insert(art.delivery_path().to_string(), b"<svg/>".to_vec());
        }
        DropService::new(catalog, Box::new(assets))
    }

    #[test]
    fn test_roll_lifecycle_verifies() {
        let service = demo_service();
        let ticket = service.commit();

        let n = service.inventory().available as u64;
        let outcome = service.resolve_roll(&ticket.id, "abc", n).unwrap();
        assert!(outcome.index < n);

        let reveal = service.reveal(&ticket.id).unwrap();
        assert_eq!(reveal.hash, ticket.hash);
        assert!(verify_reveal(&reveal, "abc", n, outcome.index));
    }

    #[test]
    fn test_resolve_input_validation() {
        let service = demo_service();
        let ticket = service.commit();

        assert!(matches!(
            service.resolve_roll("", "abc", 10),
            Err(ServiceError::BadInput(_))
        ));
        assert!(matches!(
            service.resolve_roll(&ticket.id, "", 10),
            Err(ServiceError::BadInput(_))
        ));
        assert!(matches!(
            service.resolve_roll(&ticket.id, "abc", 0),
            Err(ServiceError::BadInput(_))
        ));
        assert!(matches!(
            service.resolve_roll("unknown", "abc", 10),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn test_buy_then_download_budget() {
        let service = demo_service();
        let token = service.buy_now("cat_fortune").unwrap();

        for _ in 0..3 {
            let dl = service.download(&token).unwrap();
            assert_eq!(dl.artwork_id, "cat_fortune");
            assert_eq!(dl.mime, "image/svg+xml");
            assert_eq!(dl.file_name, "cat_fortune.svg");
            assert_eq!(dl.bytes, b"<svg/>");
        }
        assert!(matches!(
            service.download(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_buy_now_errors() {
        let service = demo_service();
        assert!(matches!(
            service.buy_now("missing"),
            Err(ServiceError::NotFound)
        ));
        service.buy_now("cat_fortune").unwrap();
        assert!(matches!(
            service.buy_now("cat_fortune"),
            Err(ServiceError::OutOfStock)
        ));
        assert!(matches!(service.buy_now(""), Err(ServiceError::BadInput(_))));
    }

    #[test]
    fn test_webhook_then_claim_flow() {
        let service = demo_service();

        // Client polls before the confirmation lands: not ready.
        assert_eq!(service.claim("cs_123"), None);

        service.payment_confirmed("cs_123", "processed-tattoo-2").unwrap();

        let claim = service.claim("cs_123").unwrap();
        assert_eq!(claim.artwork_id, "processed-tattoo-2");
        // One-shot.
        assert_eq!(service.claim("cs_123"), None);

        // The claimed token downloads the right piece.
        let dl = service.download(&claim.token).unwrap();
        assert_eq!(dl.artwork_id, "processed-tattoo-2");
    }

    #[test]
    fn test_webhook_for_sold_out_piece() {
        let service = demo_service();
        service.buy_now("cat_fortune").unwrap();

        let err = service.payment_confirmed("cs_9", "cat_fortune");
        assert!(matches!(err, Err(ServiceError::OutOfStock)));
        // No claim was parked.
        assert_eq!(service.claim("cs_9"), None);
        // And the failed confirmation did not touch stock again.
        assert_eq!(service.inventory().sold, 1);
    }

    #[test]
    fn test_download_missing_asset_bytes() {
        // Catalog entry exists but the asset store has no bytes for it.
        let catalog = Catalog::demo();
        let service = DropService::new(catalog, Box::new(MemoryAssetStore::new()));
        let token = service.buy_now("cat_fortune").unwrap();
        assert!(matches!(
            service.download(&token),
            Err(ServiceError::Asset(_))
        ));
    }

    #[test]
    fn test_inventory_reflects_sales() {
        let service = demo_service();
        let before = service.inventory();
        service.buy_now("processed-tattoo-5").unwrap();
        let after = service.inventory();

        assert_eq!(after.total, before.total);
        assert_eq!(after.available, before.available - 1);
        assert_eq!(after.sold, before.sold + 1);
        assert!(!after
            .available_ids
            .contains(&"processed-tattoo-5".to_string()));
    }
}
