//! Memoizing decorator over any [`GarmentStore`]
//!
//! The list of rows is remembered after the first successful fetch and
//! dropped on every mutation. Mutations are also published on an
//! [`EventBus`] so other views can refresh.

use crate::core::error::InventoryResult;
use crate::core::events::{EventBus, GarmentEvent};
use crate::core::garment::{Garment, NewGarment};
use crate::core::store::GarmentStore;
use async_trait::async_trait;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub struct CachedGarmentStore<S> {
    inner: S,
    cache: RwLock<Option<Vec<Garment>>>,
    /// Bumped on every invalidation; a fetch started under an older
    /// generation is not memoized
    generation: AtomicU64,
    events: EventBus,
}

impl<S: GarmentStore> CachedGarmentStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_events(inner, EventBus::default())
    }

    pub fn with_events(inner: S, events: EventBus) -> Self {
        Self {
            inner,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
            events,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Forget the memoized list; the next `list` goes to the backend
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            self.generation.fetch_add(1, Ordering::AcqRel);
            *cache = None;
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.read().map(|c| c.is_some()).unwrap_or(false)
    }

    fn mutated(&self, event: GarmentEvent) {
        self.invalidate();
        self.events.publish(event);
    }
}

#[async_trait]
impl<S: GarmentStore> GarmentStore for CachedGarmentStore<S> {
    async fn list(&self) -> Vec<Garment> {
        if let Ok(cache) = self.cache.read() {
            if let Some(garments) = cache.as_ref() {
                return garments.clone();
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let garments = self.inner.list().await;

        // an empty answer may stand for an unreachable backend
        if !garments.is_empty() {
            if let Ok(mut cache) = self.cache.write() {
                if self.generation.load(Ordering::Acquire) == generation {
                    *cache = Some(garments.clone());
                }
            }
        }
        garments
    }

    async fn create(&self, fields: NewGarment) -> InventoryResult<Garment> {
        let created = self.inner.create(fields).await?;
        self.mutated(GarmentEvent::Created { id: created.id });
        Ok(created)
    }

    async fn update(&self, garment: Garment) -> InventoryResult<Garment> {
        let updated = self.inner.update(garment).await?;
        self.mutated(GarmentEvent::Updated { id: updated.id });
        Ok(updated)
    }

    async fn delete(&self, id: &Uuid) -> InventoryResult<()> {
        self.inner.delete(id).await?;
        self.mutated(GarmentEvent::Deleted { id: *id });
        Ok(())
    }

    async fn table_exists(&self) -> bool {
        self.inner.table_exists().await
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
