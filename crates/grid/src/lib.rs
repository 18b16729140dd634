//! Grid primitives for the world map: positions, bounds and scan rectangles.

/// Map dimensions and position-key encoding.
pub mod bounds;
/// Signed grid coordinates.
pub mod pos;
/// Clipped cell rectangles used by spatial scans.
pub mod rect;

pub use bounds::{GridError, MapBounds, PosKey};
pub use pos::GridPos;
pub use rect::{CellRect, Cells};
