//! `sf-grid`: town lattice and road topology.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`land_use`] | `LandUse` closed enumeration                                |
//! | [`lattice`]  | `CityGrid` (claim-if-empty cell store)                      |
//! | [`road`]     | `RoadSegment`, `Neighborhood`                               |
//! | [`recipe`]   | `LayoutRecipe`, `PlacementRule`, `FillTable`, default town  |
//! | [`builder`]  | `TopologyBuilder`, `Topology`                               |
//! | [`loader`]   | `load_roads_csv`, `load_neighborhoods_csv`                  |
//! | [`error`]    | `GridError`, `GridResult<T>`                                |
//!
//! # Determinism
//!
//! A topology is a pure function of the recipe and `CityConfig::seed`: two
//! builds with equal inputs produce equal lattices, segment lists and
//! neighborhoods.

pub mod builder;
pub mod error;
pub mod land_use;
pub mod lattice;
pub mod loader;
pub mod recipe;
pub mod road;


pub use builder::{Topology, TopologyBuilder};
pub use error::{GridError, GridResult};
pub use land_use::LandUse;
pub use lattice::CityGrid;
pub use loader::{check_roads, load_neighborhoods_csv, load_neighborhoods_reader, load_roads_csv, load_roads_reader};
pub use recipe::{Axis, DemographicRanges, FillTable, LayoutRecipe, PlacementRule, NEIGHBORHOOD_NAMES};
pub use road::{Neighborhood, RoadSegment};
