//! Road segments to weighted graph, and node snapping.

use sf_core::{CityConfig, GridPos, HourOfDay, Weather};
use sf_grid::RoadSegment;

use crate::graph::{EdgeAttrs, WeightedGraphBuilder};
use crate::{
    FeatureRecord, RoutePolicy, RoutingError, RoutingResult, SpeedEstimator, WeightPolicy,
    WeightedGraph,
};

/// The segment endpoint closest to `target` by Manhattan distance.
///
/// Endpoints are scanned segment by segment, `from` before `to`; on a tie
/// the first one scanned wins.  Returns `None` when there are no segments.
pub fn nearest_road_node(roads: &[RoadSegment], target: GridPos) -> Option<GridPos> {
    let mut best: Option<(GridPos, u32)> = None;
    for pos in roads.iter().flat_map(|r| r.endpoints()) {
        let d = pos.manhattan(target);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((pos, d));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Builds the weighted graph of one routing request.
///
/// For each segment, in order: assemble its feature record, ask the
/// estimator for a speed, apply the [`WeightPolicy`] and add an edge between
/// the segment's endpoints.  Nothing is cached between calls, so identical
/// inputs (and a deterministic estimator) always give identical graphs.
pub struct RouteGraphBuilder<'a, E: ?Sized> {
    config:    &'a CityConfig,
    estimator: &'a E,
    weights:   WeightPolicy,
}

impl<'a, E: SpeedEstimator + ?Sized> RouteGraphBuilder<'a, E> {
    pub fn new(config: &'a CityConfig, estimator: &'a E) -> Self {
        Self {
            config,
            estimator,
            weights: WeightPolicy::from(&config.routing),
        }
    }

    pub fn weight_policy(&self) -> &WeightPolicy {
        &self.weights
    }

    pub fn build(
        &self,
        roads:   &[RoadSegment],
        hour:    HourOfDay,
        weather: Weather,
        policy:  RoutePolicy,
    ) -> RoutingResult<WeightedGraph> {
        let mut b = WeightedGraphBuilder::new(self.config.routing.edge_merge);
        for seg in roads {
            let record = FeatureRecord::for_route(self.config, seg, hour, weather);
            let predicted = self.estimator.estimate(&record);
            let weight = self.weights.weight(seg.length_km, predicted, policy);
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(RoutingError::InvalidWeight { road: seg.id, weight });
            }
            b.add_edge(seg.from, seg.to, EdgeAttrs {
                weight,
                length_km: seg.length_km,
                speed:     self.weights.effective_speed(predicted),
                road:      seg.id,
            });
        }
        log::debug!(
            "route graph ({policy}, {hour}, {weather}): {} nodes, {} edges, {} merged",
            b.node_count(),
            b.edge_count(),
            b.merged_count(),
        );
        Ok(b.build())
    }
}
