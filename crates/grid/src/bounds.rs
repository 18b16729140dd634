use crate::{CellRect, GridPos};

/// Errors raised while constructing map bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
	/// One of the map dimensions is zero.
	#[error("map dimension `{axis}` must be positive")]
	EmptyDimension { axis: &'static str },
	/// The map has more cells than a [`PosKey`] can address.
	#[error("map of {width}x{height} cells exceeds the position key range")]
	TooLarge { width: u32, height: u32 },
}

/// Dense, collision-free key for an in-bounds cell.
///
/// Only [`MapBounds::encode`] produces keys, so holding a `PosKey` implies the
/// cell was on the map it was encoded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PosKey(u32);

impl PosKey {
	/// Returns the raw key value.
	#[inline]
	pub fn as_u32(self) -> u32 {
		self.0
	}
}

/// Fixed dimensions of the world map.
///
/// Valid positions satisfy `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapBounds {
	width: u32,
	height: u32,
}

impl MapBounds {
	/// Creates bounds for a `width` x `height` map.
	pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
		if width == 0 {
			return Err(GridError::EmptyDimension { axis: "width" });
		}
		if height == 0 {
			return Err(GridError::EmptyDimension { axis: "height" });
		}
		// Coordinates are i32 and keys are u32.
		let cells = u64::from(width) * u64::from(height);
		if width > i32::MAX as u32 || height > i32::MAX as u32 || cells > u64::from(u32::MAX) + 1 {
			return Err(GridError::TooLarge { width, height });
		}
		Ok(Self { width, height })
	}

	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns true if `pos` lies on the map.
	#[inline]
	pub fn contains(&self, pos: GridPos) -> bool {
		pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
	}

	/// Encodes an in-bounds position as `y * width + x`.
	///
	/// Returns `None` for positions off the map.
	#[inline]
	pub fn encode(&self, pos: GridPos) -> Option<PosKey> {
		if !self.contains(pos) {
			return None;
		}
		Some(PosKey(pos.y as u32 * self.width + pos.x as u32))
	}

	/// Inverse of [`encode`](Self::encode).
	pub fn decode(&self, key: PosKey) -> Option<GridPos> {
		let x = key.0 % self.width;
		let y = key.0 / self.width;
		if y >= self.height {
			return None;
		}
		Some(GridPos::new(x as i32, y as i32))
	}

	/// Rectangle of cells within `half_width`/`half_height` of `center`,
	/// clipped to the map.
	///
	/// Returns `None` if `center` itself is off the map.
	pub fn window(&self, center: GridPos, half_width: u32, half_height: u32) -> Option<CellRect> {
		if !self.contains(center) {
			return None;
		}
		let (cx, cy) = (i64::from(center.x), i64::from(center.y));
		let (hw, hh) = (i64::from(half_width), i64::from(half_height));
		Some(CellRect::from_inclusive(
			(cx - hw).max(0),
			(cx + hw).min(self.max_x()),
			(cy - hh).max(0),
			(cy + hh).min(self.max_y()),
		))
	}

	/// Square of `length` x `length` cells whose minimum corner is `origin`,
	/// clipped to the map's upper bounds.
	///
	/// Returns `None` if `origin` is off the map or `length` is not positive.
	pub fn block(&self, origin: GridPos, length: i32) -> Option<CellRect> {
		if !self.contains(origin) || length <= 0 {
			return None;
		}
		let (ox, oy) = (i64::from(origin.x), i64::from(origin.y));
		let span = i64::from(length) - 1;
		Some(CellRect::from_inclusive(
			ox,
			(ox + span).min(self.max_x()),
			oy,
			(oy + span).min(self.max_y()),
		))
	}

	#[inline]
	fn max_x(&self) -> i64 {
		i64::from(self.width) - 1
	}

	#[inline]
	fn max_y(&self) -> i64 {
		i64::from(self.height) - 1
	}
}
