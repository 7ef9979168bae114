//! Inventory dashboard controller
//!
//! Owns the canonical list of garments loaded from a [`GarmentStore`], the
//! search/filter/sort inputs and the derived visible list. Every input
//! change re-derives the visible list locally; only mount, submit and
//! delete talk to the store.
//!
//! ```text
//!            mount()
//! Loading ────────────▶ Ready
//!    │
//!    └────────────────▶ Unavailable(NotConfigured | TableMissing)
//!                            │ verify_again()
//!                            └────────────▶ Loading ...
//! ```

pub mod form;
pub mod stats;

use crate::core::error::{InventoryError, InventoryResult};
use crate::core::garment::Garment;
use crate::core::query::{self, FilterSet, SortKey, SortState};
use crate::core::store::GarmentStore;
use std::sync::Arc;
use uuid::Uuid;

pub use form::{FieldEdit, FormMode, FormSession};
pub use stats::InventoryStats;

/// Why the dashboard cannot show the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Endpoint or access key missing
    NotConfigured,
    /// Backend reachable but the garment table does not exist
    TableMissing,
}

impl UnavailableReason {
    /// Guidance shown in place of the inventory
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::NotConfigured => {
                "Storage backend is not configured: set the backend url and api_key"
            }
            UnavailableReason::TableMissing => {
                "The garment table does not exist yet: run the setup schema, then verify again"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Ready,
    Unavailable(UnavailableReason),
}

pub struct Dashboard {
    store: Arc<dyn GarmentStore>,
    state: DashboardState,
    garments: Vec<Garment>,
    visible: Vec<Garment>,
    search: String,
    filters: FilterSet,
    sort: SortState,
    form: Option<FormSession>,
    pending_delete: Option<Uuid>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn GarmentStore>) -> Self {
        Self {
            store,
            state: DashboardState::Loading,
            garments: Vec::new(),
            visible: Vec::new(),
            search: String::new(),
            filters: FilterSet::default(),
            sort: SortState::default(),
            form: None,
            pending_delete: None,
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    /// Every loaded garment, unfiltered
    pub fn garments(&self) -> &[Garment] {
        &self.garments
    }

    /// Garments after search, filters and sort
    pub fn visible(&self) -> &[Garment] {
        &self.visible
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    /// Check configuration, probe the table, then load the list
    pub async fn mount(&mut self) -> DashboardState {
        self.state = DashboardState::Loading;

        if !self.store.is_configured() {
            tracing::warn!("dashboard unavailable: storage not configured");
            return self.unavailable(UnavailableReason::NotConfigured);
        }

        if !self.store.table_exists().await {
            tracing::warn!("dashboard unavailable: garment table missing");
            return self.unavailable(UnavailableReason::TableMissing);
        }

        self.garments = self.store.list().await;
        self.state = DashboardState::Ready;
        self.refresh();

        tracing::info!(count = self.garments.len(), "dashboard ready");
        self.state
    }

    /// Manual recovery after the operator fixed configuration or schema
    pub async fn verify_again(&mut self) -> DashboardState {
        tracing::debug!(previous = ?self.state, "verifying storage again");
        self.mount().await
    }

    fn unavailable(&mut self, reason: UnavailableReason) -> DashboardState {
        self.garments.clear();
        self.visible.clear();
        self.state = DashboardState::Unavailable(reason);
        self.state
    }

    /// Re-derive the visible list; no store access
    fn refresh(&mut self) {
        self.visible = query::apply(
            &self.garments,
            &self.search,
            &self.filters,
            self.sort.key,
            self.sort.direction,
        );
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.refresh();
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterSet::default();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.refresh();
    }

    /// Column header click
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
        self.refresh();
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(FormSession::create());
    }

    pub fn open_edit_form(&mut self, id: Uuid) -> InventoryResult<()> {
        let garment = self.find(&id).ok_or(InventoryError::NotFound { id })?;
        self.form = Some(FormSession::edit(garment));
        Ok(())
    }

    /// Edit the open form; ignored when no form is open
    pub fn edit_field(&mut self, edit: FieldEdit) {
        match self.form.as_mut() {
            Some(form) => form.edit_field(edit),
            None => tracing::debug!(field = %edit.field(), "edit ignored, no form open"),
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Validate the open form and send it to the store
    ///
    /// On success the stored garment is merged into the list and the form
    /// closes. On failure the form stays open carrying the error. Returns
    /// `Ok(None)` when no form is open.
    pub async fn submit(&mut self) -> InventoryResult<Option<Garment>> {
        let Some(form) = self.form.as_mut() else {
            return Ok(None);
        };

        let fields = form.prepare()?;
        let result = match form.mode() {
            FormMode::Create => self.store.create(fields).await,
            FormMode::Edit { id, created_at } => {
                self.store.update(fields.into_garment(id, created_at)).await
            }
        };

        let stored = match result {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "garment submit failed");
                form.fail(&err);
                return Err(err);
            }
        };

        match form.mode() {
            FormMode::Create => self.garments.push(stored.clone()),
            FormMode::Edit { .. } => {
                if let Some(slot) = self.garments.iter_mut().find(|g| g.id == stored.id) {
                    *slot = stored.clone();
                }
            }
        }

        self.form = None;
        self.refresh();
        Ok(Some(stored))
    }

    /// First step of a delete; nothing is removed until confirmed
    pub fn request_delete(&mut self, id: Uuid) -> InventoryResult<()> {
        if self.find(&id).is_none() {
            return Err(InventoryError::NotFound { id });
        }
        self.pending_delete = Some(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Remove the pending garment locally, then from the store
    ///
    /// A failed store delete puts the garment back at its old position.
    /// Returns `Ok(None)` when no delete was requested.
    pub async fn confirm_delete(&mut self) -> InventoryResult<Option<Uuid>> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        let position = self.garments.iter().position(|g| g.id == id);
        let removed = position.map(|index| (index, self.garments.remove(index)));
        self.refresh();

        if let Err(err) = self.store.delete(&id).await {
            tracing::warn!(garment_id = %id, error = %err, "delete failed, restoring garment");
            if let Some((index, garment)) = removed {
                let index = index.min(self.garments.len());
                self.garments.insert(index, garment);
                self.refresh();
            }
            return Err(err);
        }

        Ok(Some(id))
    }

    /// Summary over every loaded garment
    pub fn stats(&self) -> InventoryStats {
        InventoryStats::compute(&self.garments)
    }

    fn find(&self, id: &Uuid) -> Option<&Garment> {
        self.garments.iter().find(|g| g.id == *id)
    }
}
