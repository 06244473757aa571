//! Flat topology rows.
//!
//! Column names match what `sf_grid::loader` reads back, so a written
//! topology can be reloaded as-is.

use sf_grid::{Neighborhood, RoadSegment};

pub const ROAD_COLUMNS: [&str; 10] = [
    "road_id",
    "street_name",
    "from_x",
    "from_y",
    "to_x",
    "to_y",
    "length_km",
    "num_lanes",
    "speed_limit",
    "is_intersection",
];

pub const NEIGHBORHOOD_COLUMNS: [&str; 7] = [
    "neighborhood_id",
    "display_name",
    "neighborhood_population",
    "working_population_pct",
    "students_population",
    "x",
    "y",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RoadRow {
    pub road_id:         u32,
    pub street_name:     String,
    pub from_x:          i32,
    pub from_y:          i32,
    pub to_x:            i32,
    pub to_y:            i32,
    pub length_km:       f64,
    pub num_lanes:       Option<u8>,
    pub speed_limit:     Option<u8>,
    pub is_intersection: bool,
}

impl From<&RoadSegment> for RoadRow {
    fn from(r: &RoadSegment) -> Self {
        Self {
            road_id:         r.id.0,
            street_name:     r.street_name.clone(),
            from_x:          r.from.x,
            from_y:          r.from.y,
            to_x:            r.to.x,
            to_y:            r.to.y,
            length_km:       r.length_km,
            num_lanes:       r.lanes,
            speed_limit:     r.speed_limit,
            is_intersection: r.is_intersection,
        }
    }
}

impl RoadRow {
    /// Values in [`ROAD_COLUMNS`] order; absent optionals are empty.
    pub fn to_record(&self) -> [String; 10] {
        let opt = |v: Option<u8>| v.map(|x| x.to_string()).unwrap_or_default();
        [
            self.road_id.to_string(),
            self.street_name.clone(),
            self.from_x.to_string(),
            self.from_y.to_string(),
            self.to_x.to_string(),
            self.to_y.to_string(),
            self.length_km.to_string(),
            opt(self.num_lanes),
            opt(self.speed_limit),
            (self.is_intersection as u8).to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodRow {
    pub neighborhood_id:         u16,
    pub display_name:            String,
    pub neighborhood_population: u32,
    pub working_population_pct:  f64,
    pub students_population:     u32,
    pub x:                       i32,
    pub y:                       i32,
}

impl From<&Neighborhood> for NeighborhoodRow {
    fn from(n: &Neighborhood) -> Self {
        Self {
            neighborhood_id:         n.id.0,
            display_name:            n.name.clone(),
            neighborhood_population: n.population,
            working_population_pct:  n.working_population_pct,
            students_population:     n.students,
            x:                       n.anchor.x,
            y:                       n.anchor.y,
        }
    }
}

impl NeighborhoodRow {
    pub fn to_record(&self) -> [String; 7] {
        [
            self.neighborhood_id.to_string(),
            self.display_name.clone(),
            self.neighborhood_population.to_string(),
            self.working_population_pct.to_string(),
            self.students_population.to_string(),
            self.x.to_string(),
            self.y.to_string(),
        ]
    }
}
