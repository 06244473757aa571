//! Routing-subsystem error type.

use thiserror::Error;

use sf_core::{CoreError, GridPos, NeighborhoodId, RoadId};

/// Errors produced by `sf-routing`.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("unknown route policy {0:?}: expected shortest-distance, least-congestion or balanced")]
    InvalidPolicy(String),

    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    #[error("neighborhood {0} not found in topology")]
    UnknownNeighborhood(NeighborhoodId),

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("road {road}: edge weight {weight} is negative or not finite")]
    InvalidWeight { road: RoadId, weight: f64 },

    #[error("no path from {from} to {to}")]
    NoPath { from: GridPos, to: GridPos },

    #[error("speed model error: {0}")]
    Model(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
