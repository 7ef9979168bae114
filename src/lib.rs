//! # Boutique Inventory
//!
//! Garment inventory management for a small clothing shop: a typed record
//! store over a hosted PostgREST table, a local search/filter/sort engine,
//! form validation and a dashboard controller, exposed over an axum HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use inventory::prelude::*;
//!
//! let config = InventoryConfig::load_or_default("inventory.yaml")?;
//! let store = CachedGarmentStore::new(RestGarmentStore::new(config.backend.clone())?);
//!
//! let mut dashboard = Dashboard::new(Arc::new(store));
//! match dashboard.mount().await {
//!     DashboardState::Ready => println!("{} garments", dashboard.visible().len()),
//!     DashboardState::Unavailable(reason) => eprintln!("{}", reason.message()),
//!     DashboardState::Loading => unreachable!(),
//! }
//! ```

pub mod config;
pub mod core;
pub mod dashboard;
pub mod logging;
pub mod server;
pub mod storage;

pub use logging::init_tracing;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        EventBus, Field, FieldErrors, FilterSet, Garment, GarmentDraft, GarmentEvent,
        GarmentStore, InventoryError, InventoryResult, ListQuery, NewGarment, PaidFilter, Size,
        SortDirection, SortKey, SortState,
        garment::TABLE_SCHEMA,
        query::apply,
        validation::{ValidatedDraft, validate},
    };

    // === Dashboard ===
    pub use crate::dashboard::{
        Dashboard, DashboardState, FieldEdit, FormMode, FormSession, InventoryStats,
        UnavailableReason,
    };

    // === Storage ===
    pub use crate::storage::{CachedGarmentStore, InMemoryGarmentStore, RestGarmentStore};

    // === Config ===
    pub use crate::config::{BackendConfig, InventoryConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
