//! Garment store implementations

pub mod cached;
pub mod in_memory;
pub mod rest;

pub use cached::CachedGarmentStore;
pub use in_memory::InMemoryGarmentStore;
pub use rest::RestGarmentStore;
