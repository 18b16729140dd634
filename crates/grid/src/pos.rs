/// A cell coordinate on the world map.
///
/// Coordinates are signed so that requests which fall off the map (for
/// example a scan centred at `x = -1`) are representable and can be rejected
/// by [`MapBounds`](crate::MapBounds) instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
	pub x: i32,
	pub y: i32,
}

impl GridPos {
	/// Creates a position from its coordinates.
	#[inline]
	pub const fn new(x: i32, y: i32) -> Self {
		Self { x, y }
	}
}

impl From<(i32, i32)> for GridPos {
	fn from((x, y): (i32, i32)) -> Self {
		Self::new(x, y)
	}
}

impl std::fmt::Display for GridPos {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.x, self.y)
	}
}
