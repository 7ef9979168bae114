//! In-memory implementation of GarmentStore for testing and development

use crate::core::error::{InventoryError, InventoryResult};
use crate::core::garment::{Garment, NewGarment};
use crate::core::store::GarmentStore;
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory garment store
///
/// Rows are kept in insertion order so that garments created within the
/// same clock tick still list newest first.
#[derive(Clone)]
pub struct InMemoryGarmentStore {
    garments: Arc<RwLock<IndexMap<Uuid, Garment>>>,
}

impl InMemoryGarmentStore {
    pub fn new() -> Self {
        Self {
            garments: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Start with existing rows, e.g. fixtures
    pub fn with_garments(garments: impl IntoIterator<Item = Garment>) -> Self {
        let map = garments.into_iter().map(|g| (g.id, g)).collect();
        Self {
            garments: Arc::new(RwLock::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.garments.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryGarmentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(operation: &str) -> InventoryError {
    InventoryError::storage(operation, "in-memory store lock poisoned")
}

#[async_trait]
impl GarmentStore for InMemoryGarmentStore {
    async fn list(&self) -> Vec<Garment> {
        let Ok(garments) = self.garments.read() else {
            tracing::warn!("in-memory store lock poisoned, listing nothing");
            return Vec::new();
        };

        let mut list: Vec<Garment> = garments.values().rev().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    async fn create(&self, fields: NewGarment) -> InventoryResult<Garment> {
        let mut garments = self.garments.write().map_err(|_| poisoned("create"))?;

        let garment = fields.into_garment(Uuid::new_v4(), Utc::now());
        garments.insert(garment.id, garment.clone());

        Ok(garment)
    }

    async fn update(&self, garment: Garment) -> InventoryResult<Garment> {
        let mut garments = self.garments.write().map_err(|_| poisoned("update"))?;

        let stored = garments
            .get_mut(&garment.id)
            .ok_or(InventoryError::NotFound { id: garment.id })?;

        // created_at is immutable
        *stored = stored.with_changes(garment.fields());

        Ok(stored.clone())
    }

    async fn delete(&self, id: &Uuid) -> InventoryResult<()> {
        let mut garments = self.garments.write().map_err(|_| poisoned("delete"))?;

        garments.shift_remove(id);

        Ok(())
    }

    async fn table_exists(&self) -> bool {
        true
    }
}
