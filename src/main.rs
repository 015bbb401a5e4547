//! Fortune Drop Server
//!
//! Demo binary: walks the full drop lifecycle against the built-in
//! catalog — commit, client-seeded roll, purchase, downloads, reveal,
//! independent verification, and the webhook-style confirmation path.

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fortune_drop::core::entropy::random_hex;
use fortune_drop::fairness::verify_reveal;
use fortune_drop::service::{DropService, MemoryAssetStore, ServiceError};
use fortune_drop::shop::Catalog;
use fortune_drop::VERSION;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Fortune Drop Server v{}", VERSION);

    let catalog = Catalog::demo();
    let mut assets = MemoryAssetStore::new();
    for art in catalog.iter() {
        let placeholder = format!("<svg><!-- {} --></svg>", art.id);
        assets.insert(art.delivery_path().to_string(), placeholder.into_bytes());
    }
    let service = DropService::new(catalog, Box::new(assets));

    info!("=== Provably-Fair Roll ===");
    let ticket = service.commit();
    info!("Commitment id: {}", ticket.id);
    info!("Published hash: {}", ticket.hash);
    info!("Nonce: {}", ticket.nonce);

    let client_seed = random_hex(8);
    let summary = service.inventory();
    let n = summary.available as u64;
    info!("Client seed: {} over {} available pieces", client_seed, n);

    let outcome = service.resolve_roll(&ticket.id, &client_seed, n)?;
    let rolled_id = summary.available_ids[outcome.index as usize].clone();
    info!("Rolled index {} -> {}", outcome.index, rolled_id);

    info!("=== Purchase & Delivery ===");
    let token = service.buy_now(&rolled_id)?;
    info!("Entitlement token minted: {}", token);

    for attempt in 1..=3 {
        let download = service.download(&token)?;
        info!(
            "Download {} of 3: {} ({}, {} bytes)",
            attempt,
            download.file_name,
            download.mime,
            download.bytes.len()
        );
    }
    match service.download(&token) {
        Err(ServiceError::InvalidToken) => info!("Fourth download rejected, budget spent"),
        other => anyhow::bail!("expected exhausted token, got {other:?}"),
    }

    info!("=== Reveal & Verify ===");
    let reveal = service.reveal(&ticket.id)?;
    info!("Revealed server seed: {}", reveal.server_seed);
    if verify_reveal(&reveal, &client_seed, n, outcome.index) {
        info!("FAIRNESS VERIFIED: hash and index both check out");
    } else {
        anyhow::bail!("fairness verification failed");
    }

    info!("=== Webhook Confirmation Path ===");
    let session_id = format!("cs_demo_{}", random_hex(6));
    let next_summary = service.inventory();
    let next_id = next_summary
        .available_ids
        .first()
        .context("catalog sold out")?
        .clone();
    service.payment_confirmed(&session_id, &next_id)?;
    let claim = service
        .claim(&session_id)
        .context("claim should be parked")?;
    info!("Session {} claimed token for {}", session_id, claim.artwork_id);

    let final_summary = service.inventory();
    info!(
        "Inventory: {} total, {} available, {} sold",
        final_summary.total, final_summary.available, final_summary.sold
    );

    Ok(())
}
