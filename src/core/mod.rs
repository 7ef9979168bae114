//! Core module containing the garment model, query engine, validation and store trait

pub mod error;
pub mod events;
pub mod garment;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{InventoryError, InventoryResult};
pub use events::{EventBus, GarmentEvent};
pub use garment::{Garment, GarmentDraft, NewGarment, Size};
pub use query::{FilterSet, ListQuery, PaidFilter, SortDirection, SortKey, SortState};
pub use store::GarmentStore;
pub use validation::{Field, FieldErrors};
