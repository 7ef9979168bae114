//! HTTP handlers for the garment API
//!
//! Handlers only translate between HTTP and the [`GarmentStore`]; search,
//! filtering and sorting are delegated to [`query::apply`].

use crate::core::error::{InventoryError, InventoryResult};
use crate::core::garment::{Garment, TABLE_SCHEMA};
use crate::core::query::{self, ListQuery};
use crate::core::store::GarmentStore;
use crate::core::validation::ValidatedDraft;
use crate::dashboard::InventoryStats;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GarmentStore>,
    /// Backing table name, reported when it is missing
    pub table: String,
}

impl AppState {
    pub fn new(store: Arc<dyn GarmentStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// All garments, or the reason they cannot be listed
    ///
    /// An empty list is only trusted once the table is known to exist.
    async fn load(&self) -> InventoryResult<Vec<Garment>> {
        if !self.store.is_configured() {
            return Err(InventoryError::NotConfigured);
        }

        let garments = self.store.list().await;
        if garments.is_empty() && !self.store.table_exists().await {
            return Err(InventoryError::TableMissing {
                table: self.table.clone(),
            });
        }
        Ok(garments)
    }
}

/// Response for the list endpoint
#[derive(Debug, Serialize)]
pub struct ListGarmentsResponse {
    pub garments: Vec<Garment>,
    /// Garments after search and filters
    pub count: usize,
    /// Garments in the store
    pub total: usize,
}

/// Response for the status endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub configured: bool,
    pub table_exists: bool,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME")
    }))
}

/// Configuration and schema diagnostics
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let configured = state.store.is_configured();
    let table_exists = configured && state.store.table_exists().await;
    Json(StatusResponse {
        configured,
        table_exists,
    })
}

/// DDL for creating the garment table
pub async fn schema() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        TABLE_SCHEMA,
    )
}

/// List garments with optional search, filters and sort
///
/// GET /garments?search=ana&size=M&paid=unpaid&sort=price:desc
pub async fn list_garments(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> InventoryResult<Json<ListGarmentsResponse>> {
    let filters = params.filters()?;
    let sort = params.sort()?;

    let garments = state.load().await?;
    let total = garments.len();
    let visible = query::apply(
        &garments,
        params.search_text(),
        &filters,
        sort.key,
        sort.direction,
    );

    tracing::debug!(total, count = visible.len(), "listed garments");

    Ok(Json(ListGarmentsResponse {
        count: visible.len(),
        total,
        garments: visible,
    }))
}

pub async fn garment_stats(State(state): State<AppState>) -> InventoryResult<Json<InventoryStats>> {
    let garments = state.load().await?;
    Ok(Json(InventoryStats::compute(&garments)))
}

pub async fn create_garment(
    State(state): State<AppState>,
    ValidatedDraft(fields): ValidatedDraft,
) -> InventoryResult<impl IntoResponse> {
    let garment = state.store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(garment)))
}

pub async fn update_garment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedDraft(fields): ValidatedDraft,
) -> InventoryResult<Json<Garment>> {
    let id = parse_id(&id)?;

    // the store keeps the row's own created_at
    let updated = state.store.update(fields.into_garment(id, Utc::now())).await?;
    Ok(Json(updated))
}

/// Deleting an absent garment still answers 204
pub async fn delete_garment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> InventoryResult<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(value: &str) -> InventoryResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| InventoryError::InvalidId {
        value: value.to_string(),
    })
}
