use std::iter::FusedIterator;

use crate::GridPos;

/// Inclusive rectangle of on-map cells.
///
/// Produced by [`MapBounds::window`](crate::MapBounds::window) and
/// [`MapBounds::block`](crate::MapBounds::block); both constructors clip
/// before building, so every cell yielded by [`cells`](Self::cells) is valid
/// for the bounds that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
	min: GridPos,
	max: GridPos,
}

impl CellRect {
	/// Callers guarantee `0 <= min <= max <= i32::MAX` on both axes.
	pub(crate) fn from_inclusive(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
		debug_assert!(0 <= min_x && min_x <= max_x && max_x <= i64::from(i32::MAX));
		debug_assert!(0 <= min_y && min_y <= max_y && max_y <= i64::from(i32::MAX));
		Self {
			min: GridPos::new(min_x as i32, min_y as i32),
			max: GridPos::new(max_x as i32, max_y as i32),
		}
	}

	/// Smallest corner (inclusive).
	#[inline]
	pub fn min(&self) -> GridPos {
		self.min
	}

	/// Largest corner (inclusive).
	#[inline]
	pub fn max(&self) -> GridPos {
		self.max
	}

	/// Number of columns covered.
	#[inline]
	pub fn width(&self) -> u32 {
		(self.max.x - self.min.x) as u32 + 1
	}

	/// Number of rows covered.
	#[inline]
	pub fn height(&self) -> u32 {
		(self.max.y - self.min.y) as u32 + 1
	}

	/// Total number of cells covered.
	#[inline]
	pub fn area(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	/// Returns true if `pos` lies inside the rectangle.
	#[inline]
	pub fn contains(&self, pos: GridPos) -> bool {
		(self.min.x..=self.max.x).contains(&pos.x) && (self.min.y..=self.max.y).contains(&pos.y)
	}

	/// Iterates every cell, outer loop over `x` and inner loop over `y`.
	pub fn cells(&self) -> Cells {
		Cells {
			rect: *self,
			next: Some(self.min),
		}
	}
}

impl IntoIterator for CellRect {
	type Item = GridPos;
	type IntoIter = Cells;

	fn into_iter(self) -> Cells {
		self.cells()
	}
}

/// Iterator over the cells of a [`CellRect`].
#[derive(Debug, Clone)]
pub struct Cells {
	rect: CellRect,
	next: Option<GridPos>,
}

impl Iterator for Cells {
	type Item = GridPos;

	fn next(&mut self) -> Option<GridPos> {
		let cur = self.next?;
		self.next = if cur.y < self.rect.max.y {
			Some(GridPos::new(cur.x, cur.y + 1))
		} else if cur.x < self.rect.max.x {
			Some(GridPos::new(cur.x + 1, self.rect.min.y))
		} else {
			None
		};
		Some(cur)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let Some(cur) = self.next else {
			return (0, Some(0));
		};
		let rows = u64::from(self.rect.height());
		let cols_after = (self.rect.max.x - cur.x) as u64;
		let left_in_col = (self.rect.max.y - cur.y) as u64 + 1;
		let remaining = cols_after * rows + left_in_col;
		match usize::try_from(remaining) {
			Ok(n) => (n, Some(n)),
			Err(_) => (usize::MAX, None),
		}
	}
}

impl FusedIterator for Cells {}
