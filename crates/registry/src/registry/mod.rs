//! Shared, lock-protected city registry.
//!
//! [`CityRegistry`] wraps one [`CityIndex`] in a single reader/writer lock.
//! Queries take the read lock for the whole traversal; [`load`] and
//! [`register`] take the write lock. An identity miss is served in two
//! phases: the durable-store round trip runs with no lock held, then the
//! write lock is taken only to install the fetched record. Two concurrent
//! misses on the same id may therefore both reach the store; the second
//! install finds the first one's record and keeps it.
//!
//! [`load`]: CityRegistry::load
//! [`register`]: CityRegistry::register

use std::sync::Arc;

use fief_grid::{GridPos, MapBounds};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
	City, CityId, CityIndex, CityStore, ConfigError, IndexViolation, InsertReport, RegistryConfig,
	RegistryError, RoleId, ScanConfig, StoreError,
};

/// Point-in-time registry counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
	pub cities: usize,
	pub owners: usize,
	pub occupied_cells: usize,
}

/// In-memory city registry backed by a durable [`CityStore`].
///
/// Thread-safe; share it across request handlers via `Arc<CityRegistry>`.
/// Records are handed out as `Arc<City>` snapshots. To change a city's id,
/// owner or position, register the updated record.
pub struct CityRegistry {
	index: RwLock<CityIndex>,
	store: Arc<dyn CityStore>,
	scan: ScanConfig,
}

impl std::fmt::Debug for CityRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CityRegistry")
			.field("bounds", &self.bounds())
			.field("scan", &self.scan)
			.field("cities", &self.len())
			.finish_non_exhaustive()
	}
}

impl CityRegistry {
	/// Creates an empty registry. Call [`load`](Self::load) to populate it.
	pub fn new(config: &RegistryConfig, store: Arc<dyn CityStore>) -> Result<Self, ConfigError> {
		Ok(Self::with_bounds(config.bounds()?, config.scan, store))
	}

	/// Creates an empty registry from already validated bounds.
	pub fn with_bounds(bounds: MapBounds, scan: ScanConfig, store: Arc<dyn CityStore>) -> Self {
		Self {
			index: RwLock::new(CityIndex::new(bounds)),
			store,
			scan,
		}
	}

	/// Map bounds used for position keys and scan clipping.
	pub fn bounds(&self) -> MapBounds {
		self.index.read().bounds()
	}

	/// Replaces the registry contents with every city in the durable store.
	///
	/// A store failure is logged and whatever was read before it is kept;
	/// startup continues with a partial registry. Records that cannot be
	/// indexed (off the map) are skipped with a warning. Returns the number
	/// of cities indexed afterwards.
	pub fn load(&self) -> usize {
		let mut index = self.index.write();
		let mut fresh = CityIndex::new(index.bounds());
		let mut skipped = 0usize;

		let result = self.store.load_all(&mut |city| {
			let id = city.id;
			match fresh.insert(city) {
				Ok(report) => log_insert(id, &report),
				Err(e) => {
					skipped += 1;
					warn!(city = %id, error = %e, "skipping unindexable city");
				}
			}
		});
		if let Err(e) = result {
			error!(error = %e, loaded = fresh.len(), "city load failed; continuing with partial data");
		}

		*index = fresh;
		info!(cities = index.len(), owners = index.owner_count(), skipped, "loaded cities");
		index.len()
	}

	/// Registers a newly founded or updated city in every index.
	///
	/// The caller is responsible for position uniqueness: a different city
	/// already on the target cell is overwritten there (and a warning is
	/// logged). Use [`try_register`](Self::try_register) to reject that
	/// instead. Fails only if the city is off the map.
	pub fn register(&self, city: City) -> Result<(), RegistryError> {
		let id = city.id;
		let report = self.index.write().insert(city)?;
		log_insert(id, &report);
		Ok(())
	}

	/// Registers `city` only if its cell is free or already held by the same
	/// id. Nothing is modified on error.
	pub fn try_register(&self, city: City) -> Result<(), RegistryError> {
		let mut index = self.index.write();
		if let Some(occupant) = index.at(city.pos)
			&& occupant.id != city.id
		{
			return Err(RegistryError::PositionOccupied {
				pos: city.pos,
				occupant: occupant.id,
			});
		}
		let id = city.id;
		let report = index.insert(city)?;
		drop(index);
		log_insert(id, &report);
		Ok(())
	}

	/// Looks up a city by id, reading through to the durable store on a miss.
	///
	/// A store failure is logged and reported as `None`; use
	/// [`lookup`](Self::lookup) to tell the two apart.
	pub fn get(&self, id: CityId) -> Option<Arc<City>> {
		match self.lookup(id) {
			Ok(found) => found,
			Err(e) => {
				warn!(city = %id, error = %e, "city store lookup failed");
				None
			}
		}
	}

	/// Like [`get`](Self::get), but surfaces store failures.
	pub fn lookup(&self, id: CityId) -> Result<Option<Arc<City>>, StoreError> {
		if let Some(city) = self.index.read().get(id) {
			return Ok(Some(Arc::clone(city)));
		}
		self.backfill(id)
	}

	/// Fetches `id` from the durable store and installs it in every index.
	///
	/// The fetch runs without the registry lock. If another caller installed
	/// the same id in the meantime, that record is kept and returned. A
	/// stored city whose cell is held by a different registered city never
	/// displaces it; the fetched record is served uncached instead.
	pub fn backfill(&self, id: CityId) -> Result<Option<Arc<City>>, StoreError> {
		let Some(city) = self.store.fetch(id)? else {
			debug!(city = %id, "city not found in store");
			return Ok(None);
		};

		let mut index = self.index.write();
		if let Some(existing) = index.get(id) {
			return Ok(Some(Arc::clone(existing)));
		}
		if let Some(occupant) = index.at(city.pos) {
			let occupant = occupant.id;
			drop(index);
			warn!(
				city = %id,
				occupant = %occupant,
				x = city.pos.x,
				y = city.pos.y,
				"stored city's cell is held by another city; serving it uncached"
			);
			return Ok(Some(Arc::new(city)));
		}
		match index.insert(city.clone()) {
			Ok(report) => {
				let installed = index.get(id).cloned();
				drop(index);
				log_insert(id, &report);
				debug!(city = %id, "backfilled city from store");
				Ok(installed)
			}
			Err(e) => {
				drop(index);
				warn!(city = %id, error = %e, "stored city cannot be indexed; serving it uncached");
				Ok(Some(Arc::new(city)))
			}
		}
	}

	/// Cities owned by `owner`, in registration order.
	///
	/// `None` means the owner never registered a city. An owner whose cities
	/// all moved to other owners yields an empty list.
	pub fn by_owner(&self, owner: RoleId) -> Option<Vec<Arc<City>>> {
		self.index.read().owned_by(owner).map(<[_]>::to_vec)
	}

	/// Returns true if a city occupies cell `(x, y)`.
	pub fn is_occupied(&self, x: i32, y: i32) -> bool {
		self.index.read().at(GridPos::new(x, y)).is_some()
	}

	/// City occupying cell `(x, y)`, if any.
	pub fn at_position(&self, x: i32, y: i32) -> Option<Arc<City>> {
		self.index.read().at(GridPos::new(x, y)).cloned()
	}

	/// Cities within the configured scan window centred on `(x, y)`.
	///
	/// The window is clipped to the map. A centre off the map yields no
	/// cities.
	pub fn scan(&self, x: i32, y: i32) -> Vec<Arc<City>> {
		let index = self.index.read();
		let Some(rect) = index
			.bounds()
			.window(GridPos::new(x, y), self.scan.half_width, self.scan.half_height)
		else {
			return Vec::new();
		};
		index.collect_in(rect)
	}

	/// Cities within the `length` x `length` square whose minimum corner is
	/// `(x, y)`, clipped to the map.
	pub fn scan_block(&self, x: i32, y: i32, length: i32) -> Vec<Arc<City>> {
		let index = self.index.read();
		let Some(rect) = index.bounds().block(GridPos::new(x, y), length) else {
			return Vec::new();
		};
		index.collect_in(rect)
	}

	/// Number of cached cities.
	pub fn len(&self) -> usize {
		self.index.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.read().is_empty()
	}

	/// Number of owners with an entry in the owner index.
	pub fn owner_count(&self) -> usize {
		self.index.read().owner_count()
	}

	pub fn stats(&self) -> RegistryStats {
		let index = self.index.read();
		RegistryStats {
			cities: index.len(),
			owners: index.owner_count(),
			occupied_cells: index.occupied_cells(),
		}
	}

	/// Checks cross-index consistency under the read lock.
	pub fn verify(&self) -> Result<(), IndexViolation> {
		self.index.read().verify()
	}
}

fn log_insert(id: CityId, report: &InsertReport) {
	if let Some(displaced) = &report.displaced {
		warn!(
			city = %id,
			displaced = %displaced.id,
			x = displaced.pos.x,
			y = displaced.pos.y,
			"city overwrote another city's cell"
		);
	}
	if report.replaced.is_some() {
		debug!(city = %id, "replaced registered city");
	}
}
