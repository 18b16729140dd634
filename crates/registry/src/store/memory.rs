use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{CityStore, StoreError};
use crate::{City, CityId};

/// In-process store.
///
/// Cities are yielded by [`load_all`](CityStore::load_all) in ascending id
/// order. Call counters make round trips observable, which is how callers
/// check that the registry served a lookup from cache.
#[derive(Debug, Default)]
pub struct MemoryStore {
	records: Mutex<BTreeMap<CityId, City>>,
	load_calls: AtomicUsize,
	fetch_calls: AtomicUsize,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store holding `cities`; later duplicates of an id win.
	pub fn with_cities(cities: impl IntoIterator<Item = City>) -> Self {
		let store = Self::new();
		{
			let mut records = store.records.lock();
			for city in cities {
				records.insert(city.id, city);
			}
		}
		store
	}

	/// Inserts or replaces a city, returning the previous record.
	pub fn insert(&self, city: City) -> Option<City> {
		self.records.lock().insert(city.id, city)
	}

	/// Number of stored cities.
	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	/// Returns true if the store holds no cities.
	pub fn is_empty(&self) -> bool {
		self.records.lock().is_empty()
	}

	/// Number of [`load_all`](CityStore::load_all) calls served.
	pub fn load_calls(&self) -> usize {
		self.load_calls.load(Ordering::Relaxed)
	}

	/// Number of [`fetch`](CityStore::fetch) calls served.
	pub fn fetch_calls(&self) -> usize {
		self.fetch_calls.load(Ordering::Relaxed)
	}
}

impl CityStore for MemoryStore {
	fn load_all(&self, visit: &mut dyn FnMut(City)) -> Result<(), StoreError> {
		self.load_calls.fetch_add(1, Ordering::Relaxed);
		// Snapshot first so `visit` never runs under our lock.
		let snapshot: Vec<City> = self.records.lock().values().cloned().collect();
		snapshot.into_iter().for_each(visit);
		Ok(())
	}

	fn fetch(&self, id: CityId) -> Result<Option<City>, StoreError> {
		self.fetch_calls.fetch_add(1, Ordering::Relaxed);
		Ok(self.records.lock().get(&id).cloned())
	}
}

#[cfg(test)]
mod tests {
	use fief_grid::GridPos;

	use super::*;
	use crate::RoleId;

	fn city(id: u32) -> City {
		City::new(CityId(id), RoleId(1), GridPos::new(id as i32, 0))
	}

	#[test]
	fn load_all_visits_in_id_order() {
		let store = MemoryStore::with_cities([city(3), city(1), city(2)]);
		let mut seen = Vec::new();
		store.load_all(&mut |c| seen.push(c.id.0)).unwrap();
		assert_eq!(seen, vec![1, 2, 3]);
		assert_eq!(store.load_calls(), 1);
	}

	#[test]
	fn fetch_counts_hits_and_misses() {
		let store = MemoryStore::with_cities([city(5)]);
		assert_eq!(store.fetch(CityId(5)).unwrap(), Some(city(5)));
		assert_eq!(store.fetch(CityId(6)).unwrap(), None);
		assert_eq!(store.fetch_calls(), 2);
	}

	#[test]
	fn insert_replaces() {
		let store = MemoryStore::new();
		assert!(store.is_empty());
		assert_eq!(store.insert(city(1)), None);
		let renamed = city(1).with_name("Renamed");
		assert_eq!(store.insert(renamed), Some(city(1)));
		assert_eq!(store.len(), 1);
	}
}
