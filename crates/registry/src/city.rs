//! City records and their identifiers.

use fief_grid::GridPos;
use serde::{Deserialize, Serialize};

/// Unique identity of a city, assigned when the city is founded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub u32);

impl std::fmt::Display for CityId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Identity of the role (player) that owns a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u32);

impl std::fmt::Display for RoleId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A player-owned city placed on the world map.
///
/// `id`, `owner` and `pos` are indexed by the registry. Once a record has been
/// registered it is shared as an `Arc<City>` and never mutated in place; a
/// changed record goes back through
/// [`CityRegistry::register`](crate::CityRegistry::register) so every index
/// sees the change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
	pub id: CityId,
	pub owner: RoleId,
	#[serde(flatten)]
	pub pos: GridPos,
	#[serde(default)]
	pub name: String,
	/// Whether this is the owner's capital.
	#[serde(default)]
	pub is_main: bool,
	#[serde(default)]
	pub durability: u32,
	/// Founding time, seconds since the Unix epoch.
	#[serde(default)]
	pub created_at: u64,
}

impl City {
	/// Creates a city with default attributes.
	pub fn new(id: CityId, owner: RoleId, pos: GridPos) -> Self {
		Self {
			id,
			owner,
			pos,
			name: String::new(),
			is_main: false,
			durability: 0,
			created_at: 0,
		}
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Marks the city as its owner's capital.
	pub fn main(mut self) -> Self {
		self.is_main = true;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn json_shape_is_flat() {
		let city = City::new(CityId(1), RoleId(7), GridPos::new(3, 4)).with_name("Aster");
		let json = serde_json::to_value(&city).unwrap();
		assert_eq!(json["id"], 1);
		assert_eq!(json["owner"], 7);
		assert_eq!(json["x"], 3);
		assert_eq!(json["y"], 4);
		assert_eq!(json["name"], "Aster");
	}

	#[test]
	fn optional_attributes_default() {
		let city: City = serde_json::from_str(r#"{"id":2,"owner":9,"x":0,"y":5}"#).unwrap();
		assert_eq!(city, City::new(CityId(2), RoleId(9), GridPos::new(0, 5)));
	}
}
