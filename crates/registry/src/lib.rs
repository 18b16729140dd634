//! City registry.
//!
//! Keeps every founded city in memory under three views that never diverge:
//! - by [`CityId`], for identity lookups with read-through to the durable store
//! - by map cell, for occupancy checks and windowed spatial scans
//! - by owning [`RoleId`], in founding order
//!
//! The durable store is reached through the [`CityStore`] trait. Two
//! implementations ship with the crate: [`MemoryStore`] and the file-backed
//! [`JsonLinesStore`].

pub mod city;
pub mod config;
pub mod error;
pub mod index;
pub mod registry;
pub mod store;

pub use city::{City, CityId, RoleId};
pub use config::{ConfigError, MapConfig, RegistryConfig, ScanConfig};
pub use error::RegistryError;
pub use fief_grid::{GridPos, MapBounds};
pub use index::{CityIndex, IndexViolation, InsertReport};
pub use registry::{CityRegistry, RegistryStats};
pub use store::{CityStore, JsonLinesStore, MemoryStore, StoreError};
