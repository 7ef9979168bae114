//! Store trait for garment persistence

use crate::core::error::InventoryResult;
use crate::core::garment::{Garment, NewGarment};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence operations against the single garment table
///
/// Implementations talk to one logical table. The dashboard and the HTTP
/// layer only ever see this trait, so a hosted backend and the in-memory
/// store are interchangeable.
#[async_trait]
pub trait GarmentStore: Send + Sync {
    /// All garments, newest `created_at` first
    ///
    /// Never fails: an unreachable backend or a missing table yields an
    /// empty list. Use [`table_exists`](Self::table_exists) to tell the two apart.
    async fn list(&self) -> Vec<Garment>;

    /// Persist a new garment with a fresh id and the current time
    async fn create(&self, fields: NewGarment) -> InventoryResult<Garment>;

    /// Replace every mutable field of the garment with `garment.id`
    ///
    /// The stored `created_at` is kept whatever the caller passes. Fails
    /// with `NotFound` when no such row exists.
    async fn update(&self, garment: Garment) -> InventoryResult<Garment>;

    /// Remove the garment; deleting an absent id succeeds
    async fn delete(&self, id: &Uuid) -> InventoryResult<()>;

    /// Probe whether the backing table exists
    ///
    /// Only a "missing relation" answer means `false`; any other failure is
    /// taken as proof the backend is there.
    async fn table_exists(&self) -> bool;

    /// Whether the store has what it needs to reach its backend
    fn is_configured(&self) -> bool {
        true
    }
}
