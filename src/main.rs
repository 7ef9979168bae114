//! Boutique inventory HTTP server
//!
//! Usage: `boutique-inventory [config.yaml]` (default `inventory.yaml`)

use anyhow::Result;
use inventory::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    inventory::init_tracing()?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inventory.yaml".to_string());
    let config = InventoryConfig::load_or_default(&path)?;

    let backend = RestGarmentStore::new(config.backend.clone())?;
    if !backend.is_configured() {
        tracing::warn!("backend url or api_key missing, garment routes will answer 503");
    }

    tracing::info!(
        table = %config.backend.table,
        configured = backend.is_configured(),
        "starting boutique inventory"
    );

    let store = CachedGarmentStore::new(backend);
    store.events().spawn_logger();

    ServerBuilder::new()
        .with_store(store)
        .with_table(config.backend.table.clone())
        .serve(&config.server.bind)
        .await
}
