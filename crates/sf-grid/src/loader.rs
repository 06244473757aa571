//! CSV topology loader.
//!
//! # CSV formats
//!
//! Roads, one row per segment.  `length_km`, `num_lanes` and `speed_limit`
//! may be empty or absent:
//!
//! ```csv
//! road_id,street_name,from_x,from_y,to_x,to_y,length_km,num_lanes,speed_limit
//! 0,Maple Ave,1,4,2,4,0.1,,
//! R1,Maple Ave,2,4,3,4,0.1,2,30
//! ```
//!
//! Neighborhoods, one row per neighborhood.  `display_name` is optional;
//! missing names come from the fixed name list by row position:
//!
//! ```csv
//! neighborhood_id,display_name,neighborhood_population,working_population_pct,students_population,x,y
//! N0,Mill Creek,5200,0.61,800,2,2
//! ```
//!
//! Ids accept the prefixed (`R7`, `N3`) or bare integer form.  Intersection
//! flags are not read; the topology builder derives them.  Road ids must be
//! unique and lengths positive.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sf_core::{GridPos, NeighborhoodId, RoadId};

use crate::recipe::neighborhood_name;
use crate::{GridError, GridResult, Neighborhood, RoadSegment};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RoadRecord {
    road_id:     String,
    #[serde(default)]
    street_name: String,
    from_x:      i32,
    from_y:      i32,
    to_x:        i32,
    to_y:        i32,
    #[serde(default)]
    length_km:   Option<f64>,
    #[serde(default)]
    num_lanes:   Option<u8>,
    #[serde(default)]
    speed_limit: Option<u8>,
}

#[derive(Deserialize)]
struct NeighborhoodRecord {
    neighborhood_id:         String,
    #[serde(default)]
    display_name:            Option<String>,
    neighborhood_population: u32,
    working_population_pct:  f64,
    students_population:     u32,
    x:                       i32,
    y:                       i32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load road segments from a CSV file.  Segments without a `length_km`
/// get `default_length_km`.
pub fn load_roads_csv(path: &Path, default_length_km: f64) -> GridResult<Vec<RoadSegment>> {
    let file = std::fs::File::open(path).map_err(GridError::Io)?;
    load_roads_reader(file, default_length_km)
}

/// Like [`load_roads_csv`] but accepts any `Read` source.
pub fn load_roads_reader<R: Read>(reader: R, default_length_km: f64) -> GridResult<Vec<RoadSegment>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<RoadRecord>()
        .map(|result| {
            let row = result.map_err(|e| GridError::Parse(e.to_string()))?;
            Ok(RoadSegment {
                id:              row.road_id.parse::<RoadId>()?,
                street_name:     row.street_name,
                from:            GridPos::new(row.from_x, row.from_y),
                to:              GridPos::new(row.to_x, row.to_y),
                length_km:       row.length_km.unwrap_or(default_length_km),
                lanes:           row.num_lanes,
                speed_limit:     row.speed_limit,
                is_intersection: false,
            })
        })
        .collect::<GridResult<Vec<_>>>()
        .and_then(|roads| {
            check_roads(&roads)?;
            Ok(roads)
        })
}

/// Reject road lists with a repeated `road_id` or a length that is not a
/// positive finite number.
pub fn check_roads(roads: &[RoadSegment]) -> GridResult<()> {
    let mut seen = HashSet::with_capacity(roads.len());
    for r in roads {
        if !seen.insert(r.id) {
            return Err(GridError::Parse(format!("duplicate road_id {}", r.id)));
        }
        if !(r.length_km.is_finite() && r.length_km > 0.0) {
            return Err(GridError::Parse(format!(
                "road {}: length_km {} is not a positive number",
                r.id, r.length_km
            )));
        }
    }
    Ok(())
}

/// Load neighborhoods from a CSV file.
pub fn load_neighborhoods_csv(path: &Path) -> GridResult<Vec<Neighborhood>> {
    let file = std::fs::File::open(path).map_err(GridError::Io)?;
    load_neighborhoods_reader(file)
}

/// Like [`load_neighborhoods_csv`] but accepts any `Read` source.
pub fn load_neighborhoods_reader<R: Read>(reader: R) -> GridResult<Vec<Neighborhood>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<NeighborhoodRecord>()
        .enumerate()
        .map(|(i, result)| {
            let row = result.map_err(|e| GridError::Parse(e.to_string()))?;
            if !(0.0..=1.0).contains(&row.working_population_pct) {
                return Err(GridError::Parse(format!(
                    "neighborhood {}: working_population_pct {} outside [0, 1]",
                    row.neighborhood_id, row.working_population_pct
                )));
            }
            Ok(Neighborhood {
                id:                     row.neighborhood_id.parse::<NeighborhoodId>()?,
                name:                   row
                    .display_name
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| neighborhood_name(i)),
                anchor:                 GridPos::new(row.x, row.y),
                population:             row.neighborhood_population,
                working_population_pct: row.working_population_pct,
                students:               row.students_population,
            })
        })
        .collect()
}
