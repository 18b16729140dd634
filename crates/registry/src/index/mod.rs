//! Three-way city index.
//!
//! [`CityIndex`] owns the by-id, by-cell and by-owner views of one set of
//! cities. Every mutation goes through [`CityIndex::insert`], which updates
//! all three views together. The index itself is not synchronized;
//! [`CityRegistry`](crate::CityRegistry) wraps it in a single reader/writer
//! lock.

use std::sync::Arc;

use fief_grid::{CellRect, GridPos, MapBounds, PosKey};
use rustc_hash::FxHashMap;

use crate::{City, CityId, RegistryError, RoleId};

/// Outcome of a successful [`CityIndex::insert`].
#[derive(Debug, Default)]
pub struct InsertReport {
	/// Previous record with the same id, now unlinked from every view.
	pub replaced: Option<Arc<City>>,
	/// A different city that occupied the target cell.
	///
	/// It keeps its by-id and by-owner entries but is no longer reachable by
	/// position; [`CityIndex::verify`] reports it until it is re-registered
	/// elsewhere.
	pub displaced: Option<Arc<City>>,
}

/// Broken cross-view invariant found by [`CityIndex::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexViolation {
	#[error("city {id} is not indexed at its cell {pos}")]
	MissingPosition { id: CityId, pos: GridPos },
	#[error("city {id} is off the map at {pos}")]
	OffMap { id: CityId, pos: GridPos },
	#[error("cell {pos} holds city {id}, which is not the registered record")]
	StalePosition { id: CityId, pos: GridPos },
	#[error("city {id} appears {count} times in the cities of owner {owner}")]
	OwnerCount { id: CityId, owner: RoleId, count: usize },
	#[error("owner {owner} lists city {id}, which is not the registered record")]
	StaleOwnerEntry { id: CityId, owner: RoleId },
}

/// City records indexed by id, cell and owner.
#[derive(Debug, Clone)]
pub struct CityIndex {
	bounds: MapBounds,
	by_id: FxHashMap<CityId, Arc<City>>,
	by_pos: FxHashMap<PosKey, Arc<City>>,
	by_owner: FxHashMap<RoleId, Vec<Arc<City>>>,
}

impl CityIndex {
	/// Creates an empty index for a map of the given bounds.
	pub fn new(bounds: MapBounds) -> Self {
		Self {
			bounds,
			by_id: FxHashMap::default(),
			by_pos: FxHashMap::default(),
			by_owner: FxHashMap::default(),
		}
	}

	#[inline]
	pub fn bounds(&self) -> MapBounds {
		self.bounds
	}

	/// Inserts `city` into all three views.
	///
	/// A record already registered under the same id is replaced: it is
	/// removed from its owner's list and from its old cell before the new
	/// record goes in, so owner lists never hold stale duplicates. A
	/// different city already on the target cell is overwritten there and
	/// returned as [`InsertReport::displaced`].
	pub fn insert(&mut self, city: City) -> Result<InsertReport, RegistryError> {
		let Some(key) = self.bounds.encode(city.pos) else {
			return Err(RegistryError::OutOfBounds {
				id: city.id,
				pos: city.pos,
				width: self.bounds.width(),
				height: self.bounds.height(),
			});
		};

		let city = Arc::new(city);
		let replaced = self.by_id.insert(city.id, Arc::clone(&city));
		if let Some(old) = &replaced {
			self.unlink(old);
		}
		let displaced = self
			.by_pos
			.insert(key, Arc::clone(&city))
			.filter(|prev| prev.id != city.id);
		self.by_owner.entry(city.owner).or_default().push(city);

		Ok(InsertReport { replaced, displaced })
	}

	/// Drops a replaced record from the cell and owner views.
	fn unlink(&mut self, old: &Arc<City>) {
		if let Some(key) = self.bounds.encode(old.pos)
			&& self.by_pos.get(&key).is_some_and(|c| Arc::ptr_eq(c, old))
		{
			self.by_pos.remove(&key);
		}
		// The owner key stays even if the list becomes empty.
		if let Some(cities) = self.by_owner.get_mut(&old.owner) {
			cities.retain(|c| !Arc::ptr_eq(c, old));
		}
	}

	pub fn get(&self, id: CityId) -> Option<&Arc<City>> {
		self.by_id.get(&id)
	}

	pub fn contains(&self, id: CityId) -> bool {
		self.by_id.contains_key(&id)
	}

	/// City occupying `pos`, if any. Off-map positions are never occupied.
	pub fn at(&self, pos: GridPos) -> Option<&Arc<City>> {
		self.bounds.encode(pos).and_then(|key| self.by_pos.get(&key))
	}

	/// Cities of `owner` in registration order, or `None` for an owner that
	/// never registered a city.
	pub fn owned_by(&self, owner: RoleId) -> Option<&[Arc<City>]> {
		self.by_owner.get(&owner).map(Vec::as_slice)
	}

	/// Cities inside `rect`, in the rectangle's cell traversal order.
	pub fn collect_in(&self, rect: CellRect) -> Vec<Arc<City>> {
		// Sparse maps: filtering occupied cells beats probing every cell.
		if rect.area() > self.by_pos.len() as u64 {
			let mut found: Vec<_> = self.by_pos.values().filter(|c| rect.contains(c.pos)).cloned().collect();
			found.sort_unstable_by_key(|c| (c.pos.x, c.pos.y));
			return found;
		}
		let mut found = Vec::new();
		for pos in rect.cells() {
			if let Some(city) = self.at(pos) {
				found.push(Arc::clone(city));
			}
		}
		found
	}

	/// Number of registered cities.
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Number of owners that ever registered a city.
	pub fn owner_count(&self) -> usize {
		self.by_owner.len()
	}

	/// Number of occupied cells.
	pub fn occupied_cells(&self) -> usize {
		self.by_pos.len()
	}

	/// Checks that the three views describe the same set of cities.
	pub fn verify(&self) -> Result<(), IndexViolation> {
		for city in self.by_id.values() {
			let Some(key) = self.bounds.encode(city.pos) else {
				return Err(IndexViolation::OffMap { id: city.id, pos: city.pos });
			};
			if !self.by_pos.get(&key).is_some_and(|c| Arc::ptr_eq(c, city)) {
				return Err(IndexViolation::MissingPosition { id: city.id, pos: city.pos });
			}
			let count = self
				.by_owner
				.get(&city.owner)
				.map_or(0, |cities| cities.iter().filter(|c| Arc::ptr_eq(c, city)).count());
			if count != 1 {
				return Err(IndexViolation::OwnerCount {
					id: city.id,
					owner: city.owner,
					count,
				});
			}
		}

		for (key, city) in &self.by_pos {
			let registered = self.by_id.get(&city.id).is_some_and(|c| Arc::ptr_eq(c, city));
			if !registered || self.bounds.encode(city.pos) != Some(*key) {
				return Err(IndexViolation::StalePosition { id: city.id, pos: city.pos });
			}
		}

		for (owner, cities) in &self.by_owner {
			for city in cities {
				let registered = self.by_id.get(&city.id).is_some_and(|c| Arc::ptr_eq(c, city));
				if !registered || city.owner != *owner {
					return Err(IndexViolation::StaleOwnerEntry { id: city.id, owner: *owner });
				}
			}
		}

		Ok(())
	}
}
