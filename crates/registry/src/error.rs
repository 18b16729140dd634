use fief_grid::GridPos;

use crate::CityId;

/// Errors returned by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The city's coordinates are not on the configured map.
	#[error("city {id} at {pos} is off the {width}x{height} map")]
	OutOfBounds {
		id: CityId,
		pos: GridPos,
		width: u32,
		height: u32,
	},
	/// A different city already occupies the target cell.
	#[error("cell {pos} is already occupied by city {occupant}")]
	PositionOccupied { pos: GridPos, occupant: CityId },
}
