//! Route table for the garment API

use super::handlers::{
    AppState, create_garment, delete_garment, garment_stats, health_check, list_garments, schema,
    status, update_garment,
};
use axum::{
    Router,
    routing::{get, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full router
///
/// - GET /health, /healthz - Liveness
/// - GET /status - Configuration and table diagnostics
/// - GET /schema - Table DDL
/// - GET /garments - List with search, filters and sort
/// - GET /garments/stats - Inventory statistics
/// - POST /garments - Create
/// - PUT /garments/{id} - Update
/// - DELETE /garments/{id} - Delete
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .merge(garment_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn garment_routes(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/schema", get(schema))
        .route("/garments", get(list_garments).post(create_garment))
        .route("/garments/stats", get(garment_stats))
        .route("/garments/{id}", put(update_garment).delete(delete_garment))
        .with_state(state)
}
