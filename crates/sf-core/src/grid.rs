//! Integer lattice coordinates.
//!
//! The town is a square lattice of `grid_size × grid_size` cells.  Road
//! network nodes are lattice coordinates too, so a `GridPos` doubles as the
//! canonical identity of a routing node; its `Display` form `(x,y)` is the
//! node label written to the telemetry corpus.
//!
//! Coordinates are signed so that layout rules may reference positions
//! outside the grid; those are clipped by the topology builder, never
//! rejected here.

use std::fmt;

/// A cell position on the town lattice.  `x` grows east, `y` grows south.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance in cells.
    #[inline]
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> GridPos {
        GridPos::new(self.x + dx, self.y + dy)
    }

    /// The four edge-adjacent positions (west, east, north, south).  May lie
    /// outside the grid.
    #[inline]
    pub fn neighbors4(self) -> [GridPos; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// `true` if the position lies inside a `size × size` grid.
    #[inline]
    pub fn in_bounds(self, size: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < size && (self.y as u32) < size
    }

    /// Row-major index into a `size × size` cell array.  Caller guarantees
    /// `in_bounds(size)`.
    #[inline]
    pub fn cell_index(self, size: u32) -> usize {
        self.y as usize * size as usize + self.x as usize
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
