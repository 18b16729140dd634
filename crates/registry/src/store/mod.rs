//! Durable-store seam.
//!
//! The registry never talks to persistence directly. It bulk-loads through
//! [`CityStore::load_all`] at startup and falls back to [`CityStore::fetch`]
//! when an identity lookup misses the cache.

mod json_lines;
mod memory;

pub use json_lines::JsonLinesStore;
pub use memory::MemoryStore;

use crate::{City, CityId};

/// Errors reported by a durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// Underlying I/O failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// A stored record could not be decoded.
	#[error("corrupt record on line {line}: {source}")]
	Decode {
		line: usize,
		source: serde_json::Error,
	},
	/// A record could not be encoded for writing.
	#[error("failed to encode city {id}: {source}")]
	Encode {
		id: CityId,
		source: serde_json::Error,
	},
	/// The store is temporarily unreachable.
	#[error("store unavailable: {0}")]
	Unavailable(String),
}

/// Persistence layer of record for cities.
///
/// Implementations must be shareable across request threads; the registry
/// calls them without holding its own lock.
pub trait CityStore: Send + Sync {
	/// Streams every stored city to `visit`.
	///
	/// Cities visited before an error is returned stay visited, so a failing
	/// store can still yield a partial load.
	fn load_all(&self, visit: &mut dyn FnMut(City)) -> Result<(), StoreError>;

	/// Looks up a single city by identity.
	fn fetch(&self, id: CityId) -> Result<Option<City>, StoreError>;
}
