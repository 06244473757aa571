//! Road segments and residential neighborhoods.

use sf_core::{GridPos, NeighborhoodId, RoadId};

/// One edge of the road network, joining two grid-adjacent road cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    /// Stable for the lifetime of a topology; assigned in generation order.
    pub id: RoadId,
    pub street_name: String,
    pub from: GridPos,
    pub to: GridPos,
    /// Physical length in km.
    pub length_km: f64,
    /// Fixed lane count, if the segment has one.  Otherwise the telemetry
    /// simulator draws one per sample.
    pub lanes: Option<u8>,
    /// Posted speed limit, if any.
    pub speed_limit: Option<u8>,
    /// `true` if either endpoint is shared by three or more segments.
    pub is_intersection: bool,
}

impl RoadSegment {
    /// Both endpoints, `from` first.  This is the scan order used by
    /// nearest-node resolution.
    #[inline]
    pub fn endpoints(&self) -> [GridPos; 2] {
        [self.from, self.to]
    }

    /// `true` if the endpoints are Manhattan-adjacent.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.from.manhattan(self.to) == 1
    }
}

/// A residential origin of school trips.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub name: String,
    pub anchor: GridPos,
    pub population: u32,
    /// Fraction of the population that commutes, in `[0, 1]`.
    pub working_population_pct: f64,
    pub students: u32,
}

impl Neighborhood {
    /// Commuting residents: `population × working_population_pct`.
    #[inline]
    pub fn working_population(&self) -> f64 {
        self.population as f64 * self.working_population_pct
    }
}
