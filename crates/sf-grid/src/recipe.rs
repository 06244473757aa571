//! Ordered layout recipes.
//!
//! A [`LayoutRecipe`] is an ordered list of [`PlacementRule`]s plus the
//! neighborhood sites.  The builder applies rules in list order and every
//! rule only claims cells that are still empty, so an earlier rule always
//! wins an overlap.  [`PlacementRule::ScatterFill`] is the designated fill
//! pass: it visits every remaining empty cell in row-major order and makes
//! one seeded draw per cell.
//!
//! Rules may reference coordinates outside the grid.  Those cells (and
//! street segments touching them) are skipped, never reported as errors.

use sf_core::GridPos;

use crate::LandUse;

/// Neighborhood names, assigned in anchor order.
pub const NEIGHBORHOOD_NAMES: [&str; 8] = [
    "Mill Creek",
    "Maple Grove",
    "Riverstone",
    "Oak Ridge",
    "Sunset Hills",
    "Willow Bend",
    "Cedar Park",
    "Lakeside",
];

/// Display name of the `index`-th neighborhood.  Falls back to
/// `Neighborhood N<index>` once the name list is exhausted.
pub fn neighborhood_name(index: usize) -> String {
    NEIGHBORHOOD_NAMES
        .get(index)
        .map(|s| (*s).to_owned())
        .unwrap_or_else(|| format!("Neighborhood N{index}"))
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Direction a street runs in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Constant `y`, increasing `x`.
    Horizontal,
    /// Constant `x`, increasing `y`.
    Vertical,
}

/// Probability table of the fill pass.  Entries are tried in order against
/// one uniform draw in `[0, 1)`; `otherwise` takes the remaining mass.
#[derive(Clone, Debug, PartialEq)]
pub struct FillTable {
    pub entries:   Vec<(LandUse, f64)>,
    pub otherwise: LandUse,
}

impl FillTable {
    /// Map a uniform draw in `[0, 1)` to a land use.
    pub fn pick(&self, r: f64) -> LandUse {
        let mut cumulative = 0.0;
        for &(land_use, p) in &self.entries {
            cumulative += p;
            if r < cumulative {
                return land_use;
            }
        }
        self.otherwise
    }
}

/// One step of a layout recipe.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementRule {
    /// A straight street of unit segments.  Cells `from..=to` along `axis` at
    /// fixed coordinate `line` become road; one segment joins each pair of
    /// consecutive cells.
    Street {
        name: String,
        axis: Axis,
        line: i32,
        from: i32,
        to:   i32,
    },
    /// A `width × height` housing block with its top-left corner at every
    /// neighborhood anchor.
    NeighborhoodHousing { width: u32, height: u32 },
    /// A `width × height` rectangle of `land_use` with top-left `origin`.
    Block {
        origin:   GridPos,
        width:    u32,
        height:   u32,
        land_use: LandUse,
    },
    /// An explicit cell list of `land_use`.
    Cells { cells: Vec<GridPos>, land_use: LandUse },
    /// Seeded fill of every remaining empty cell.  Cells with a 4-connected
    /// road neighbour use `near_road`, all others use `elsewhere`.
    ScatterFill { near_road: FillTable, elsewhere: FillTable },
}

impl PlacementRule {
    pub fn street(name: &str, axis: Axis, line: i32, from: i32, to: i32) -> Self {
        PlacementRule::Street { name: name.to_owned(), axis, line, from, to }
    }

    pub fn block(x: i32, y: i32, width: u32, height: u32, land_use: LandUse) -> Self {
        PlacementRule::Block { origin: GridPos::new(x, y), width, height, land_use }
    }
}

/// Inclusive ranges for drawing neighborhood demographics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemographicRanges {
    pub population:  (u32, u32),
    pub working_pct: (f64, f64),
    pub students:    (u32, u32),
}

impl Default for DemographicRanges {
    fn default() -> Self {
        Self {
            population:  (3_000, 9_000),
            working_pct: (0.45, 0.70),
            students:    (400, 1_200),
        }
    }
}

// ── LayoutRecipe ──────────────────────────────────────────────────────────────

/// Everything needed to generate a town, apart from the seed.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRecipe {
    /// Neighborhood anchors, in id order.  Out-of-bounds anchors are skipped.
    pub neighborhood_sites: Vec<GridPos>,
    pub demographics: DemographicRanges,
    /// Applied in order.
    pub rules: Vec<PlacementRule>,
}

impl LayoutRecipe {
    /// The SafeFlow demo town: seven streets, seven neighborhoods, four
    /// parks, two store clusters, a 3×3 school campus with a park strip, a
    /// library and a seeded fill of the rest.
    pub fn default_town() -> Self {
        use Axis::{Horizontal, Vertical};
        use LandUse::*;

        let school_campus: Vec<GridPos> = (17..=19)
            .flat_map(|y| (13..=15).map(move |x| GridPos::new(x, y)))
            .collect();

        Self {
            neighborhood_sites: vec![
                GridPos::new(2, 2),
                GridPos::new(6, 6),
                GridPos::new(10, 3),
                GridPos::new(5, 15),
                GridPos::new(14, 8),
                GridPos::new(9, 17),
                GridPos::new(16, 5),
            ],
            demographics: DemographicRanges::default(),
            rules: vec![
                PlacementRule::street("Maple Ave", Horizontal, 4, 1, 18),
                PlacementRule::street("Oak St", Horizontal, 9, 3, 16),
                PlacementRule::street("Pine Blvd", Horizontal, 14, 0, 12),
                PlacementRule::street("1st St", Vertical, 3, 2, 17),
                PlacementRule::street("2nd St", Vertical, 7, 0, 14),
                PlacementRule::street("3rd St", Vertical, 12, 5, 19),
                PlacementRule::street("4th St", Vertical, 17, 1, 10),
                PlacementRule::NeighborhoodHousing { width: 3, height: 2 },
                PlacementRule::block(2, 2, 3, 4, Park),
                PlacementRule::block(11, 3, 3, 3, Park),
                PlacementRule::block(6, 9, 3, 4, Park),
                PlacementRule::block(15, 6, 3, 3, Park),
                PlacementRule::block(13, 11, 2, 2, Store),
                PlacementRule::block(4, 14, 2, 2, Store),
                PlacementRule::Cells { cells: school_campus, land_use: School },
                PlacementRule::block(12, 17, 1, 3, Park),
                PlacementRule::block(9, 12, 2, 2, Library),
                PlacementRule::ScatterFill {
                    near_road: FillTable {
                        entries:   vec![(Grocery, 0.15), (Store, 0.15), (House, 0.15)],
                        otherwise: OpenLand,
                    },
                    elsewhere: FillTable {
                        entries:   vec![(Park, 0.20), (House, 0.10)],
                        otherwise: OpenLand,
                    },
                },
            ],
        }
    }
}

impl Default for LayoutRecipe {
    fn default() -> Self {
        Self::default_town()
    }
}
