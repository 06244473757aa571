//! `sf-routing`: request-time routing for the SafeFlow simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`features`]  | `FeatureRecord`, indicator encoding                       |
//! | [`schema`]    | `FeatureSchema` (align to trained columns)                |
//! | [`estimator`] | `SpeedEstimator` trait, linear / rule / cached estimators |
//! | [`policy`]    | `RoutePolicy`, `WeightPolicy`                             |
//! | [`graph`]     | `WeightedGraph` (CSR), `WeightedGraphBuilder`             |
//! | [`network`]   | `RouteGraphBuilder`, `nearest_road_node`                  |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`planner`]   | `RoutePlanner`, `RouteRequest`, `RouteOutcome`            |
//! | [`error`]     | `RoutingError`, `RoutingResult<T>`                        |
//!
//! # Request flow
//!
//! ```text
//! RouteRequest ─► snap origin ─► per segment: FeatureRecord ─► estimator
//!                                   ─► WeightPolicy ─► WeightedGraph
//!              ─► Router (Dijkstra) ─► RouteOutcome::{Found, NoRoute}
//! ```

pub mod error;
pub mod estimator;
pub mod features;
pub mod graph;
pub mod network;
pub mod planner;
pub mod policy;
pub mod router;
pub mod schema;

#[cfg(test)]
mod tests;

pub use error::{RoutingError, RoutingResult};
pub use estimator::{CachedEstimator, LinearSpeedModel, RuleSpeedModel, SpeedEstimator};
pub use features::{FeatureRecord, FeatureValue};
pub use graph::{EdgeAttrs, WeightedGraph, WeightedGraphBuilder};
pub use network::{RouteGraphBuilder, nearest_road_node};
pub use planner::{PlannedRoute, RouteOutcome, RoutePlanner, RouteRequest};
pub use policy::{RoutePolicy, WeightPolicy};
pub use router::{DijkstraRouter, Route, Router};
pub use schema::FeatureSchema;
