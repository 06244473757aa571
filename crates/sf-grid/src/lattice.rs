//! The land-use lattice.
//!
//! Cells are stored row-major in a flat `Vec<LandUse>`.  Writes go through
//! [`CityGrid::claim`], which only succeeds on cells still tagged
//! [`LandUse::Empty`]; that single primitive is what makes rule order the
//! sole arbiter of overlapping placements.

use std::fmt;

use sf_core::GridPos;

use crate::LandUse;

/// Square lattice of land-use cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityGrid {
    size:  u32,
    cells: Vec<LandUse>,
}

impl CityGrid {
    /// An all-empty `size × size` grid.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![LandUse::Empty; size as usize * size as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Land use at `pos`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<LandUse> {
        pos.in_bounds(self.size).then(|| self.cells[pos.cell_index(self.size)])
    }

    /// Tag `pos` with `land_use` if it is inside the grid and still empty.
    ///
    /// Returns `true` if the cell was claimed.  Out-of-bounds positions are
    /// ignored.
    pub fn claim(&mut self, pos: GridPos, land_use: LandUse) -> bool {
        if !pos.in_bounds(self.size) {
            return false;
        }
        let cell = &mut self.cells[pos.cell_index(self.size)];
        if *cell == LandUse::Empty {
            *cell = land_use;
            true
        } else {
            false
        }
    }

    /// `true` if any 4-connected neighbour of `pos` is a road.
    pub fn is_road_adjacent(&self, pos: GridPos) -> bool {
        pos.neighbors4()
            .into_iter()
            .any(|n| self.get(n) == Some(LandUse::Road))
    }

    /// Number of cells carrying `land_use`.
    pub fn count(&self, land_use: LandUse) -> usize {
        self.cells.iter().filter(|&&c| c == land_use).count()
    }

    /// All positions in row-major order (y outer, x inner).
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| GridPos::new(x, y)))
    }

    /// `(position, land use)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, LandUse)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }
}

/// One line per row, one symbol per cell (see [`LandUse::symbol`]).
impl fmt::Display for CityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1) as usize) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
