//! HTTP server exposing the garment store
//!
//! `ServerBuilder` wires a [`GarmentStore`](crate::core::GarmentStore) into
//! an axum router with health, diagnostics and garment CRUD routes.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_router;
