//! Request-level routing: neighborhood in, route summary out.

use std::str::FromStr;

use sf_core::{CityConfig, GridPos, HourOfDay, NeighborhoodId, RoadId, Weather};
use sf_grid::Topology;

use crate::network::nearest_road_node;
use crate::{
    DijkstraRouter, RouteGraphBuilder, RoutePolicy, Router, RoutingError, RoutingResult,
    SpeedEstimator, WeightedGraph,
};

// ── Request / outcome ─────────────────────────────────────────────────────────

/// One routing request.  Exists only for one [`RoutePlanner::plan`] call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub hour:    HourOfDay,
    pub weather: Weather,
    pub policy:  RoutePolicy,
    pub origin:  NeighborhoodId,
}

impl RouteRequest {
    /// Fails with `InvalidRequest` for an hour outside 0–23.
    pub fn new(hour: u8, weather: Weather, policy: RoutePolicy, origin: NeighborhoodId) -> RoutingResult<Self> {
        let hour = HourOfDay::new(hour)
            .ok_or_else(|| RoutingError::InvalidRequest(format!("hour {hour} outside 0..=23")))?;
        Ok(Self { hour, weather, policy, origin })
    }

    /// Parse a request from user-facing strings.  The policy is checked
    /// first, so an unknown policy is always reported as `InvalidPolicy`.
    pub fn parse(hour: u8, weather: &str, policy: &str, origin: NeighborhoodId) -> RoutingResult<Self> {
        let policy = RoutePolicy::from_str(policy)?;
        let weather = Weather::from_str(weather)?;
        Self::new(hour, weather, policy, origin)
    }
}

/// A found route, in grid coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedRoute {
    pub origin:           NeighborhoodId,
    /// The origin anchor snapped to the road network.
    pub origin_node:      GridPos,
    pub destination_node: GridPos,
    /// Nodes from `origin_node` to `destination_node`, inclusive.
    pub path:             Vec<GridPos>,
    /// Segment traversed by each step of `path`.
    pub roads:            Vec<RoadId>,
    /// Sum of policy weights.
    pub cost:             f64,
    pub length_km:        f64,
    /// Σ length / effective speed over the traversed edges.
    pub travel_time_h:    f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    Found(PlannedRoute),
    /// The destination is unreachable from the origin's road node.
    NoRoute { from: GridPos, to: GridPos },
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&PlannedRoute> {
        match self {
            RouteOutcome::Found(r) => Some(r),
            RouteOutcome::NoRoute { .. } => None,
        }
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Answers [`RouteRequest`]s against one topology.
///
/// The destination is snapped to the road network once, at construction.
/// Every request rebuilds the weighted graph from scratch; the planner
/// itself holds no per-request state and can be shared between threads.
pub struct RoutePlanner<'a, E: ?Sized, R = DijkstraRouter> {
    config:           &'a CityConfig,
    topology:         &'a Topology,
    estimator:        &'a E,
    router:           R,
    destination_node: GridPos,
}

impl<'a, E: SpeedEstimator + ?Sized> RoutePlanner<'a, E, DijkstraRouter> {
    pub fn new(config: &'a CityConfig, topology: &'a Topology, estimator: &'a E) -> RoutingResult<Self> {
        Self::with_router(config, topology, estimator, DijkstraRouter)
    }
}

impl<'a, E: SpeedEstimator + ?Sized, R: Router> RoutePlanner<'a, E, R> {
    pub fn with_router(
        config:    &'a CityConfig,
        topology:  &'a Topology,
        estimator: &'a E,
        router:    R,
    ) -> RoutingResult<Self> {
        config.routing.validate()?;
        let destination_node =
            nearest_road_node(&topology.roads, topology.destination).ok_or(RoutingError::EmptyNetwork)?;
        log::debug!("destination {} snapped to {destination_node}", topology.destination);
        Ok(Self { config, topology, estimator, router, destination_node })
    }

    pub fn destination_node(&self) -> GridPos {
        self.destination_node
    }

    /// Road node a neighborhood's trips start from.
    pub fn origin_node(&self, origin: NeighborhoodId) -> RoutingResult<GridPos> {
        let hood = self
            .topology
            .neighborhood(origin)
            .ok_or(RoutingError::UnknownNeighborhood(origin))?;
        nearest_road_node(&self.topology.roads, hood.anchor).ok_or(RoutingError::EmptyNetwork)
    }

    /// The weighted graph `plan` would search for `request`.
    pub fn graph_for(&self, request: &RouteRequest) -> RoutingResult<WeightedGraph> {
        RouteGraphBuilder::new(self.config, self.estimator).build(
            &self.topology.roads,
            request.hour,
            request.weather,
            request.policy,
        )
    }

    /// Route from the request's neighborhood to the destination.
    ///
    /// An unreachable destination is a normal outcome
    /// ([`RouteOutcome::NoRoute`]), not an error.
    pub fn plan(&self, request: &RouteRequest) -> RoutingResult<RouteOutcome> {
        let origin_node = self.origin_node(request.origin)?;
        let graph = self.graph_for(request)?;

        let (Some(from), Some(to)) = (graph.node_id(origin_node), graph.node_id(self.destination_node)) else {
            return Err(RoutingError::EmptyNetwork);
        };

        let route = match self.router.route(&graph, from, to) {
            Ok(route) => route,
            Err(RoutingError::NoPath { from, to }) => {
                log::info!("no route from {from} to {to}");
                return Ok(RouteOutcome::NoRoute { from, to });
            }
            Err(e) => return Err(e),
        };

        let (length_km, travel_time_h) = route.edges.iter().fold((0.0, 0.0), |(len, time), e| {
            let l = graph.edge_length_km[e.index()];
            (len + l, time + l / graph.edge_speed[e.index()])
        });

        Ok(RouteOutcome::Found(PlannedRoute {
            origin: request.origin,
            origin_node,
            destination_node: self.destination_node,
            path:   route.nodes.iter().map(|&n| graph.pos(n)).collect(),
            roads:  route.edges.iter().map(|e| graph.edge_road[e.index()]).collect(),
            cost:   route.cost,
            length_km,
            travel_time_h,
        }))
    }
}
