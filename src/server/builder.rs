//! ServerBuilder for fluent API to build the inventory HTTP server

use super::handlers::AppState;
use super::router::build_router;
use crate::core::store::GarmentStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the inventory HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_store(InMemoryGarmentStore::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn GarmentStore>>,
    table: String,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            table: "shirts".to_string(),
        }
    }

    /// Set the garment store (required)
    pub fn with_store(mut self, store: impl GarmentStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Table name reported by `TABLE_MISSING` errors
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("GarmentStore is required. Call .with_store()"))?;

        Ok(build_router(AppState::new(store, self.table)))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on the first shutdown signal
///
/// A signal handler that cannot be installed never fires, leaving the
/// other one in charge.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryGarmentStore;

    #[test]
    fn test_build_requires_store() {
        let err = ServerBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("GarmentStore is required"));
    }

    #[test]
    fn test_build_with_store() {
        assert!(
            ServerBuilder::default()
                .with_store(InMemoryGarmentStore::new())
                .with_table("garments")
                .build()
                .is_ok()
        );
    }
}
