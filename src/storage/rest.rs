//! Hosted table backend speaking the PostgREST protocol
//!
//! Requests go to `{url}/rest/v1/{table}` with the access key sent both as
//! `apikey` and as a bearer token. Writes ask for
//! `Prefer: return=representation` so the stored rows come back in the
//! response body.
//!
//! | Operation      | Request                                        |
//! |----------------|------------------------------------------------|
//! | list           | `GET ?select=*&order=created_at.desc`          |
//! | create         | `POST` row                                     |
//! | update         | `PATCH ?id=eq.{id}` fields                     |
//! | delete         | `DELETE ?id=eq.{id}`                           |
//! | table_exists   | `GET ?select=id&limit=1`                       |

use crate::config::BackendConfig;
use crate::core::error::{InventoryError, InventoryResult};
use crate::core::garment::{Garment, NewGarment};
use crate::core::store::GarmentStore;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Postgres error code for an undefined table
const UNDEFINED_TABLE: &str = "42P01";
/// PostgREST schema-cache miss for an unknown table
const SCHEMA_CACHE_MISS: &str = "PGRST205";

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Why a backend request did not succeed
#[derive(Debug)]
enum BackendFailure {
    Transport(reqwest::Error),
    Rejected {
        status: StatusCode,
        body: BackendErrorBody,
    },
}

impl BackendFailure {
    fn is_missing_table(&self) -> bool {
        match self {
            BackendFailure::Transport(_) => false,
            BackendFailure::Rejected { body, .. } => {
                matches!(body.code.as_deref(), Some(UNDEFINED_TABLE | SCHEMA_CACHE_MISS))
                    || body
                        .message
                        .as_deref()
                        .is_some_and(|m| m.contains("does not exist"))
            }
        }
    }

    fn into_error(self, operation: &str) -> InventoryError {
        InventoryError::storage(operation, self)
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFailure::Transport(e) => write!(f, "request failed: {}", e),
            BackendFailure::Rejected { status, body } => {
                write!(f, "backend answered {}", status)?;
                if let Some(code) = &body.code {
                    write!(f, " [{}]", code)?;
                }
                if let Some(message) = &body.message {
                    write!(f, ": {}", message)?;
                }
                if let Some(details) = &body.details {
                    write!(f, " ({})", details)?;
                }
                if let Some(hint) = &body.hint {
                    write!(f, " hint: {}", hint)?;
                }
                Ok(())
            }
        }
    }
}

/// Garment store backed by a hosted PostgREST table
#[derive(Clone, Debug)]
pub struct RestGarmentStore {
    client: reqwest::Client,
    config: BackendConfig,
}

impl RestGarmentStore {
    /// Build a store; an unconfigured backend is accepted and reported
    /// through [`GarmentStore::is_configured`]
    pub fn new(config: BackendConfig) -> InventoryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| InventoryError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendFailure> {
        let response = request.send().await.map_err(BackendFailure::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<BackendErrorBody>(&text).unwrap_or_else(|_| {
            BackendErrorBody {
                message: (!text.is_empty()).then_some(text),
                ..BackendErrorBody::default()
            }
        });
        Err(BackendFailure::Rejected { status, body })
    }

    async fn rows(&self, request: RequestBuilder, operation: &str) -> InventoryResult<Vec<Garment>> {
        let response = self
            .send(request)
            .await
            .map_err(|f| f.into_error(operation))?;
        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| InventoryError::storage(operation, format!("unreadable rows: {}", e)))?;

        // one bad row must not hide the rest of the table
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Garment>(row) {
                Ok(garment) => Some(garment),
                Err(e) => {
                    tracing::warn!(operation, error = %e, "skipping unreadable garment row");
                    None
                }
            })
            .collect())
    }

    async fn fetch_all(&self) -> InventoryResult<Vec<Garment>> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.rows(request, "list").await
    }
}

#[async_trait]
impl GarmentStore for RestGarmentStore {
    async fn list(&self) -> Vec<Garment> {
        if !self.is_configured() {
            tracing::warn!("backend not configured, listing nothing");
            return Vec::new();
        }

        match self.fetch_all().await {
            Ok(garments) => {
                tracing::debug!(count = garments.len(), "fetched garments");
                garments
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing garments failed, returning empty inventory");
                Vec::new()
            }
        }
    }

    async fn create(&self, fields: NewGarment) -> InventoryResult<Garment> {
        if !self.is_configured() {
            return Err(InventoryError::NotConfigured);
        }

        let garment = fields.into_garment(Uuid::new_v4(), Utc::now());
        let request = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&garment);

        let stored = self
            .rows(request, "create")
            .await?
            .into_iter()
            .next()
            .unwrap_or(garment);

        tracing::info!(garment_id = %stored.id, name = %stored.name, "garment created");
        Ok(stored)
    }

    async fn update(&self, garment: Garment) -> InventoryResult<Garment> {
        if !self.is_configured() {
            return Err(InventoryError::NotConfigured);
        }

        let request = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", garment.id))])
            .header("Prefer", "return=representation")
            .json(&garment.fields());

        let stored = self
            .rows(request, "update")
            .await?
            .into_iter()
            .next()
            .ok_or(InventoryError::NotFound { id: garment.id })?;

        tracing::info!(garment_id = %stored.id, "garment updated");
        Ok(stored)
    }

    async fn delete(&self, id: &Uuid) -> InventoryResult<()> {
        if !self.is_configured() {
            return Err(InventoryError::NotConfigured);
        }

        let request = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))]);
        self.send(request)
            .await
            .map_err(|f| f.into_error("delete"))?;

        tracing::info!(garment_id = %id, "garment deleted");
        Ok(())
    }

    async fn table_exists(&self) -> bool {
        if !self.is_configured() {
            return false;
        }

        let request = self
            .request(Method::GET)
            .query(&[("select", "id"), ("limit", "1")]);
        match self.send(request).await {
            Ok(_) => true,
            Err(failure) if failure.is_missing_table() => {
                tracing::warn!(table = %self.config.table, error = %failure, "garment table is missing");
                false
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "table probe failed, assuming table exists");
                true
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}
