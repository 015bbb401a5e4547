//! Entitlement Token Store
//!
//! Converts a completed purchase into a time- and use-limited right to
//! download one specific artwork. Also owns the pending-claim bridge that
//! carries a token minted inside an asynchronous payment confirmation
//! over to the buyer's browser session, which polls for it.
//!
//! To a caller, an absent token, an expired token, and a use-exhausted
//! token are the same thing: `consume` returns `None` for all three, so a
//! probing client learns nothing about which state it hit.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Default token lifetime: 30 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 60;
/// Default number of downloads a token allows.
pub const DEFAULT_TOKEN_USES: u32 = 3;

/// Expiry and use-budget policy for minted tokens.
#[derive(Clone, Copy, Debug)]
pub struct EntitlementConfig {
    /// Seconds from mint to expiry.
    pub ttl_secs: i64,
    /// Successful downloads allowed per token.
    pub max_uses: u32,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            max_uses: DEFAULT_TOKEN_USES,
        }
    }
}

/// Stored state of one download token.
#[derive(Debug, Clone)]
struct TokenRecord {
    artwork_id: String,
    expires_at: DateTime<Utc>,
    remaining_uses: u32,
}

/// A minted token waiting for its browser session to claim it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClaim {
    /// The entitlement token id.
    pub token: String,
    /// The artwork the token authorizes.
    pub artwork_id: String,
}

/// Lock-guarded store of download tokens and pending claims.
///
/// Expiry is evaluated lazily when a token is consumed; no background
/// sweep runs. [`purge_expired`] exists for memory hygiene but
/// correctness never depends on it.
///
/// [`purge_expired`]: EntitlementStore::purge_expired
#[derive(Debug, Default)]
pub struct EntitlementStore {
    config: EntitlementConfig,
    tokens: Mutex<HashMap<String, TokenRecord>>,
    claims: Mutex<HashMap<String, PendingClaim>>,
}

impl EntitlementStore {
    /// Create a store with the default expiry/use policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a custom policy.
    pub fn with_config(config: EntitlementConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Mint a fresh token authorizing downloads of `artwork_id`.
    ///
    /// Called from inside the inventory ledger's reserve step, so a token
    /// exists exactly when a unit of stock was taken. Infallible by
    /// design — reserve must not be able to half-apply.
    pub fn mint(&self, artwork_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::seconds(self.config.ttl_secs);

        self.tokens.lock().insert(
            token.clone(),
            TokenRecord {
                artwork_id: artwork_id.to_string(),
                expires_at,
                remaining_uses: self.config.max_uses,
            },
        );

        debug!(artwork_id, %expires_at, "minted entitlement token");
        token
    }

    /// Spend one use of a token, returning the authorized artwork id.
    ///
    /// Returns `None` for unknown, expired, and exhausted tokens alike.
    /// The record is deleted when its last use is spent or when it is
    /// found expired.
    pub fn consume(&self, token: &str) -> Option<String> {
        self.consume_at(token, Utc::now())
    }

    /// Clock-injected variant of [`consume`] for tests.
    ///
    /// [`consume`]: EntitlementStore::consume
    pub fn consume_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let mut tokens = self.tokens.lock();
        let record = tokens.get_mut(token)?;

        if record.expires_at < now {
            tokens.remove(token);
            return None;
        }

        let artwork_id = record.artwork_id.clone();
        if record.remaining_uses <= 1 {
            tokens.remove(token);
        } else {
            record.remaining_uses -= 1;
        }
        Some(artwork_id)
    }

    /// Record a token for a payment session to pick up later.
    ///
    /// Used when the purchase completes on an asynchronous confirmation
    /// callback: the browser only knows its session id, so the token is
    /// parked here until the session polls [`take_pending_claim`].
    ///
    /// [`take_pending_claim`]: EntitlementStore::take_pending_claim
    pub fn put_pending_claim(&self, session_id: &str, token: &str, artwork_id: &str) {
        self.claims.lock().insert(
            session_id.to_string(),
            PendingClaim {
                token: token.to_string(),
                artwork_id: artwork_id.to_string(),
            },
        );
        debug!(session_id, artwork_id, "parked pending claim");
    }

    /// Atomically take (read and delete) a session's pending claim.
    ///
    /// `None` means "not ready yet" — the confirmation callback may not
    /// have fired. Callers poll; they must not treat this as an error.
    /// A second take for the same session always returns `None`.
    pub fn take_pending_claim(&self, session_id: &str) -> Option<PendingClaim> {
        self.claims.lock().remove(session_id)
    }

    /// Drop all expired token records. Returns how many were removed.
    ///
    /// Optional memory hygiene; expired tokens are rejected at consume
    /// time whether or not this ever runs.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut tokens = self.tokens.lock();
        let before = tokens.len();
        tokens.retain(|_, rec| rec.expires_at >= now);
        before - tokens.len()
    }

    /// Number of live token records (expired-but-unswept included).
    pub fn token_count(&self) -> usize {
        self.tokens.lock().len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
