//! `sf-core`: foundational types for the SafeFlow traffic simulator.
//!
//! This crate is a dependency of every other `sf-*` crate.  It has no `sf-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`ids`]       | `RoadId`, `NeighborhoodId`, `NodeId`, `EdgeId`           |
//! | [`grid`]      | `GridPos`, Manhattan distance, 4-neighbourhood           |
//! | [`time`]      | `HourOfDay`, `TimeWindow`, peak-period predicates        |
//! | [`weather`]   | `Weather`, `Visibility`                                  |
//! | [`labels`]    | `CongestionLevel`, `RiskLevel`                           |
//! | [`rng`]       | `SimRng` (root stream), `TaskRng` (per batch task)       |
//! | [`config`]    | `CityConfig`, `TelemetryConfig`, `RoutingConfig`         |
//! | [`error`]     | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod labels;
pub mod rng;
pub mod time;
pub mod weather;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CityConfig, EdgeMerge, MAX_METERS_PER_CELL, RoutingConfig, SpeedLimitMode, TelemetryConfig,
    WeatherScope, WeatherWeights,
};
pub use error::{CoreError, CoreResult};
pub use grid::GridPos;
pub use ids::{EdgeId, NeighborhoodId, NodeId, RoadId};
pub use labels::{CongestionLevel, RiskLevel};
pub use rng::{SimRng, TaskRng};
pub use time::{HourOfDay, TimeWindow};
pub use weather::{Visibility, Weather};
