//! Unit tests for sf-routing.
//!
//! Graph and solver tests use hand-built graphs; planner tests use the
//! default town with the rule-based estimator.

#[cfg(test)]
mod helpers {
    use sf_core::{GridPos, NeighborhoodId, RoadId};
    use sf_grid::{CityGrid, Neighborhood, RoadSegment, Topology};

    use crate::{FeatureSchema, SpeedEstimator};

    pub fn p(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y)
    }

    pub fn segment(id: u32, from: (i32, i32), to: (i32, i32)) -> RoadSegment {
        RoadSegment {
            id:              RoadId(id),
            street_name:     "Test St".into(),
            from:            p(from.0, from.1),
            to:              p(to.0, to.1),
            length_km:       0.1,
            lanes:           None,
            speed_limit:     None,
            is_intersection: false,
        }
    }

    pub fn topology(roads: Vec<RoadSegment>, anchor: GridPos, destination: GridPos) -> Topology {
        Topology {
            grid: CityGrid::new(20),
            roads,
            neighborhoods: vec![Neighborhood {
                id:                     NeighborhoodId(0),
                name:                   "Mill Creek".into(),
                anchor,
                population:             5_000,
                working_population_pct: 0.6,
                students:               800,
            }],
            destination,
        }
    }

    /// Always predicts the same speed.
    pub struct ConstEstimator {
        pub speed:  f64,
        pub schema: FeatureSchema,
    }

    impl ConstEstimator {
        pub fn new(speed: f64) -> Self {
            Self { speed, schema: FeatureSchema::new(["hour"]) }
        }
    }

    impl SpeedEstimator for ConstEstimator {
        fn schema(&self) -> &FeatureSchema {
            &self.schema
        }

        fn predict(&self, _aligned: &[f64]) -> f64 {
            self.speed
        }
    }
}

// ── Policies ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use crate::{RoutePolicy, RoutingError, WeightPolicy};

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("shortest-distance".parse::<RoutePolicy>().unwrap(), RoutePolicy::ShortestDistance);
        assert_eq!("Shortest distance".parse::<RoutePolicy>().unwrap(), RoutePolicy::ShortestDistance);
        assert_eq!("least_congestion".parse::<RoutePolicy>().unwrap(), RoutePolicy::LeastCongestion);
        assert_eq!(" BALANCED ".parse::<RoutePolicy>().unwrap(), RoutePolicy::Balanced);
        for p in RoutePolicy::ALL {
            assert_eq!(p.as_str().parse::<RoutePolicy>().unwrap(), p);
        }
    }

    #[test]
    fn unknown_policy_rejected() {
        let err = "fastest".parse::<RoutePolicy>().unwrap_err();
        assert!(matches!(err, RoutingError::InvalidPolicy(ref s) if s == "fastest"));
    }

    #[test]
    fn weights_above_floor() {
        let w = WeightPolicy::default();
        let d = 0.1;
        for s in [5.0, 12.5, 30.0, 55.0] {
            assert_eq!(w.weight(d, s, RoutePolicy::ShortestDistance), d);
            assert!((w.weight(d, s, RoutePolicy::LeastCongestion) - d / s).abs() < 1e-12);
            let expected = 0.5 * d + 0.5 * (d / s);
            assert!((w.weight(d, s, RoutePolicy::Balanced) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn speed_floor_replaces_low_predictions() {
        let w = WeightPolicy::default();
        let d = 0.1;
        for s in [4.99, 0.0, -3.0, f64::NAN] {
            assert_eq!(w.effective_speed(s), 5.0);
            assert_eq!(w.weight(d, s, RoutePolicy::LeastCongestion), d / 5.0);
            assert_eq!(w.weight(d, s, RoutePolicy::Balanced), 0.5 * d + 0.5 * (d / 5.0));
        }
    }

    #[test]
    fn distance_share_is_configurable() {
        let w = WeightPolicy { min_speed: 5.0, distance_share: 1.0 };
        assert_eq!(w.weight(0.3, 10.0, RoutePolicy::Balanced), 0.3);
    }
}

// ── Features & schema ─────────────────────────────────────────────────────────

#[cfg(test)]
mod features {
    use sf_core::{CityConfig, HourOfDay, Weather};

    use super::helpers::segment;
    use crate::{FeatureRecord, FeatureSchema, FeatureValue};

    fn route_record(weather: Weather) -> FeatureRecord {
        let config = CityConfig::default();
        let mut seg = segment(0, (11, 10), (12, 10));
        seg.is_intersection = true;
        FeatureRecord::for_route(&config, &seg, HourOfDay::new(15).unwrap(), weather)
    }

    #[test]
    fn route_record_fields() {
        let rec = route_record(Weather::Fog);
        assert_eq!(rec.get("hour"), Some(&FeatureValue::Num(15.0)));
        assert_eq!(rec.get("is_dismissal_time"), Some(&FeatureValue::Num(1.0)));
        assert_eq!(rec.get("is_intersection"), Some(&FeatureValue::Num(1.0)));
        assert_eq!(rec.get("num_lanes"), Some(&FeatureValue::Num(2.0)));
        // (12,10) to (14,18): 2 + 8 cells.
        assert_eq!(rec.get("distance_to_school_m"), Some(&FeatureValue::Num(1_000.0)));
        assert_eq!(rec.get("weather_condition"), Some(&FeatureValue::Cat("fog")));
    }

    #[test]
    fn distance_to_school_saturates() {
        let config = CityConfig { meters_per_cell: u32::MAX, ..CityConfig::default() };
        let seg = segment(0, (11, 10), (12, 10));
        let rec = FeatureRecord::for_route(&config, &seg, HourOfDay::new(9).unwrap(), Weather::Clear);
        assert_eq!(rec.get("distance_to_school_m"), Some(&FeatureValue::Num(u32::MAX as f64)));
    }

    #[test]
    fn encode_expands_categoricals() {
        let enc = route_record(Weather::Rain).encode();
        let get = |k: &str| enc.iter().find(|(n, _)| n == k).map(|(_, v)| *v);
        assert_eq!(get("weather_condition_rain"), Some(1.0));
        assert_eq!(get("visibility_level_low"), Some(1.0));
        assert_eq!(get("precipitation"), Some(1.0));
        assert_eq!(get("weather_condition"), None);
        assert_eq!(get("weather_condition_clear"), None);
    }

    #[test]
    fn set_replaces_existing() {
        let mut rec = FeatureRecord::new();
        rec.set("hour", 3u8).set("hour", 4u8);
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("hour"), Some(&FeatureValue::Num(4.0)));
    }

    #[test]
    fn align_fills_drops_and_orders() {
        let schema = FeatureSchema::new([
            "weather_condition_rain",
            "hour",
            "weather_condition_clear",
            "trained_only",
        ]);
        let x = schema.align(&route_record(Weather::Rain));
        assert_eq!(x, vec![1.0, 15.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_required_ignores_unset_indicators_and_optional() {
        let schema = FeatureSchema::new([
            "hour",
            "weather_condition_fog",
            "visibility_level_high",
            "crosswalk_present",
            "road_surface",
        ])
        .with_optional(["crosswalk_present"]);
        let rec = route_record(Weather::Rain);
        assert_eq!(schema.missing_required(&rec), vec!["road_surface"]);
    }

    #[test]
    fn sample_record_includes_crosswalk() {
        use sf_core::{TaskRng, TimeWindow};
        use sf_telemetry::{TelemetrySimulator, WindowConditions};

        let config = CityConfig::default();
        let sim = TelemetrySimulator::new(&config);
        let hood = sf_grid::Neighborhood {
            id:                     sf_core::NeighborhoodId(0),
            name:                   "Mill Creek".into(),
            anchor:                 sf_core::GridPos::new(2, 2),
            population:             5_000,
            working_population_pct: 0.6,
            students:               800,
        };
        let cond = WindowConditions::new(TimeWindow::new(0, 16, 48), Weather::Clear);
        let s = sim.simulate(cond, &segment(0, (0, 0), (1, 0)), &hood, &mut TaskRng::new(1, 2));
        let rec = FeatureRecord::from_sample(&s);
        assert!(rec.get("crosswalk_present").is_some());
        assert_eq!(rec.get("speed_limit"), Some(&FeatureValue::Num(s.speed_limit as f64)));
        assert!(rec.get("average_speed").is_none());
    }
}

// ── Estimators ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod estimator {
    use sf_core::{CityConfig, HourOfDay, Weather};

    use super::helpers::segment;
    use crate::{
        CachedEstimator, FeatureRecord, LinearSpeedModel, RoutingError, RuleSpeedModel,
        SpeedEstimator,
    };

    fn record(hour: u8, weather: Weather) -> FeatureRecord {
        FeatureRecord::for_route(
            &CityConfig::default(),
            &segment(0, (0, 0), (1, 0)),
            HourOfDay::new(hour).unwrap(),
            weather,
        )
    }

    #[test]
    fn linear_model_from_json() {
        let json = r#"{
            "intercept": 30.0,
            "coefficients": [
                { "column": "hour", "weight": -0.5 },
                { "column": "weather_condition_rain", "weight": -4.0 },
                { "column": "weather_condition_fog", "weight": -6.0 }
            ]
        }"#;
        let model = LinearSpeedModel::from_json_str(json).unwrap();
        assert_eq!(model.schema().len(), 3);
        assert_eq!(model.estimate(&record(10, Weather::Clear)), 25.0);
        assert_eq!(model.estimate(&record(10, Weather::Rain)), 21.0);
        assert_eq!(model.estimate(&record(0, Weather::Fog)), 24.0);
    }

    #[test]
    fn malformed_json_is_error() {
        let err = LinearSpeedModel::from_json_str(r#"{ "intercept": 1.0 }"#).unwrap_err();
        assert!(matches!(err, RoutingError::Json(_)));
    }

    #[test]
    fn rule_model_slower_at_peak() {
        let model = RuleSpeedModel::from_config(&CityConfig::default());
        let night = model.estimate(&record(2, Weather::Clear));
        let peak = model.estimate(&record(8, Weather::Clear));
        // 5000 × 0.6 / 150 = 20; night 20 × 0.6 + 12.5 = 24.5 vehicles.
        assert!((night - (30.0 - 0.25 * 24.5)).abs() < 1e-9);
        assert!(peak < night);
        assert!(peak >= 10.0);
    }

    #[test]
    fn cache_returns_same_value_and_counts_hits() {
        let cached = CachedEstimator::new(RuleSpeedModel::from_config(&CityConfig::default()));
        let a = cached.estimate(&record(8, Weather::Rain));
        let b = cached.estimate(&record(8, Weather::Rain));
        let c = cached.estimate(&record(9, Weather::Rain));
        assert_eq!(a, b);
        assert_eq!(c, cached.inner().estimate(&record(9, Weather::Rain)));
        assert_eq!(cached.len(), 2);
        assert_eq!(cached.hits(), 1);
    }
}

// ── Graph & solver ────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use sf_core::{EdgeMerge, RoadId};

    use super::helpers::p;
    use crate::{DijkstraRouter, EdgeAttrs, Router, RoutingError, WeightedGraphBuilder};

    fn attrs(weight: f64, road: u32) -> EdgeAttrs {
        EdgeAttrs { weight, length_km: 0.1, speed: 30.0, road: RoadId(road) }
    }

    #[test]
    fn csr_layout() {
        let mut b = WeightedGraphBuilder::new(EdgeMerge::Overwrite);
        b.add_edge(p(0, 0), p(1, 0), attrs(1.0, 0));
        b.add_edge(p(1, 0), p(2, 0), attrs(1.0, 1));
        let g = b.build();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 4);
        let mid = g.node_id(p(1, 0)).unwrap();
        assert_eq!(g.degree(mid), 2);
        for e in g.out_edges(mid) {
            assert_eq!(g.edge_from[e.index()], mid);
        }
        // Nodes are numbered in first-seen order.
        assert_eq!(g.node_id(p(0, 0)).unwrap().0, 0);
        assert_eq!(g.node_id(p(2, 0)).unwrap().0, 2);
    }

    #[test]
    fn two_short_hops_beat_one_long_edge() {
        let (a, bn, c) = (p(0, 0), p(1, 0), p(2, 0));
        let mut b = WeightedGraphBuilder::new(EdgeMerge::Overwrite);
        b.add_edge(a, bn, attrs(1.0, 0));
        b.add_edge(bn, c, attrs(1.0, 1));
        b.add_edge(a, c, attrs(5.0, 2));
        let g = b.build();

        let route = DijkstraRouter
            .route(&g, g.node_id(a).unwrap(), g.node_id(c).unwrap())
            .unwrap();
        let path: Vec<_> = route.nodes.iter().map(|&n| g.pos(n)).collect();
        assert_eq!(path, vec![a, bn, c]);
        assert_eq!(route.cost, 2.0);
        assert_eq!(route.edges.len(), 2);
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let mut b = WeightedGraphBuilder::new(EdgeMerge::Overwrite);
        b.add_edge(p(0, 0), p(1, 0), attrs(1.0, 0));
        b.add_edge(p(5, 5), p(6, 5), attrs(1.0, 1));
        let g = b.build();
        let err = DijkstraRouter
            .route(&g, g.node_id(p(0, 0)).unwrap(), g.node_id(p(6, 5)).unwrap())
            .unwrap_err();
        assert!(matches!(err, RoutingError::NoPath { from, to } if from == p(0, 0) && to == p(6, 5)));
    }

    #[test]
    fn same_node_is_trivial() {
        let mut b = WeightedGraphBuilder::new(EdgeMerge::Overwrite);
        b.add_edge(p(0, 0), p(1, 0), attrs(1.0, 0));
        let g = b.build();
        let n = g.node_id(p(1, 0)).unwrap();
        let route = DijkstraRouter.route(&g, n, n).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.nodes, vec![n]);
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn duplicate_pair_overwrites_by_default() {
        let mut b = WeightedGraphBuilder::new(EdgeMerge::Overwrite);
        assert!(!b.add_edge(p(0, 0), p(1, 0), attrs(1.0, 0)));
        assert!(b.add_edge(p(1, 0), p(0, 0), attrs(3.0, 1)));
        assert_eq!(b.merged_count(), 1);
        let g = b.build();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.weight_between(p(0, 0), p(1, 0)), Some(3.0));
        assert_eq!(g.weight_between(p(1, 0), p(0, 0)), Some(3.0));
        assert!(g.edge_road.iter().all(|&r| r == RoadId(1)));
    }

    #[test]
    fn keep_minimum_merge() {
        let mut b = WeightedGraphBuilder::new(EdgeMerge::KeepMinimum);
        b.add_edge(p(0, 0), p(1, 0), attrs(1.0, 0));
        b.add_edge(p(0, 0), p(1, 0), attrs(3.0, 1));
        let g = b.build();
        assert_eq!(g.weight_between(p(0, 0), p(1, 0)), Some(1.0));
    }
}

// ── Snapping & graph building ─────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use sf_core::{CityConfig, HourOfDay, Weather};

    use super::helpers::{ConstEstimator, p, segment};
    use crate::{RouteGraphBuilder, RoutePolicy, RoutingError, RuleSpeedModel, nearest_road_node};

    #[test]
    fn nearest_tie_takes_first_scanned() {
        let roads = vec![segment(0, (0, 0), (-1, 0)), segment(1, (2, 0), (3, 0))];
        assert_eq!(nearest_road_node(&roads, p(1, 0)), Some(p(0, 0)));

        let swapped = vec![segment(0, (2, 0), (3, 0)), segment(1, (0, 0), (-1, 0))];
        assert_eq!(nearest_road_node(&swapped, p(1, 0)), Some(p(2, 0)));
    }

    #[test]
    fn nearest_is_an_endpoint() {
        let roads = vec![segment(0, (0, 0), (0, 1)), segment(1, (5, 5), (6, 5))];
        assert_eq!(nearest_road_node(&roads, p(4, 7)), Some(p(5, 5)));
        assert_eq!(nearest_road_node(&roads, p(0, 1)), Some(p(0, 1)));
        assert_eq!(nearest_road_node(&[], p(0, 0)), None);
    }

    #[test]
    fn build_is_idempotent() {
        let config = CityConfig::default();
        let model = RuleSpeedModel::from_config(&config);
        let roads = vec![
            segment(0, (0, 0), (1, 0)),
            segment(1, (1, 0), (2, 0)),
            segment(2, (1, 0), (1, 1)),
        ];
        let builder = RouteGraphBuilder::new(&config, &model);
        let hour = HourOfDay::new(8).unwrap();
        let a = builder.build(&roads, hour, Weather::Rain, RoutePolicy::Balanced).unwrap();
        let b = builder.build(&roads, hour, Weather::Rain, RoutePolicy::Balanced).unwrap();
        assert_eq!(a.edge_weight, b.edge_weight);
        assert_eq!(a, b);
    }

    #[test]
    fn edges_carry_floored_speed() {
        let config = CityConfig::default();
        let slow = ConstEstimator::new(1.0);
        let roads = vec![segment(0, (0, 0), (1, 0))];
        let g = RouteGraphBuilder::new(&config, &slow)
            .build(&roads, HourOfDay::new(8).unwrap(), Weather::Clear, RoutePolicy::LeastCongestion)
            .unwrap();
        assert!(g.edge_speed.iter().all(|&s| s == 5.0));
        assert_eq!(g.weight_between(p(0, 0), p(1, 0)), Some(0.1 / 5.0));
    }

    #[test]
    fn negative_weight_rejected() {
        let config = CityConfig::default();
        let est = ConstEstimator::new(30.0);
        let mut seg = segment(4, (0, 0), (1, 0));
        seg.length_km = -0.1;
        let err = RouteGraphBuilder::new(&config, &est)
            .build(&[seg], HourOfDay::new(8).unwrap(), Weather::Clear, RoutePolicy::ShortestDistance)
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidWeight { road, .. } if road.0 == 4));
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use sf_core::{CityConfig, NeighborhoodId, Weather};
    use sf_grid::TopologyBuilder;

    use super::helpers::{ConstEstimator, p, segment, topology};
    use crate::{
        RouteOutcome, RoutePlanner, RoutePolicy, RouteRequest, RoutingError, RuleSpeedModel,
    };

    #[test]
    fn request_validation() {
        let err = RouteRequest::new(24, Weather::Clear, RoutePolicy::Balanced, NeighborhoodId(0)).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidRequest(_)));

        // Policy is checked before weather.
        let err = RouteRequest::parse(8, "hail", "scenic", NeighborhoodId(0)).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidPolicy(_)));

        let req = RouteRequest::parse(8, "Rain", "balanced", NeighborhoodId(2)).unwrap();
        assert_eq!(req.weather, Weather::Rain);
        assert_eq!(req.hour.get(), 8);
    }

    #[test]
    fn every_neighborhood_reaches_school() {
        let config = CityConfig::default();
        let town = TopologyBuilder::new(&config).build().unwrap();
        let model = RuleSpeedModel::from_config(&config);
        let planner = RoutePlanner::new(&config, &town, &model).unwrap();

        for hood in &town.neighborhoods {
            for policy in RoutePolicy::ALL {
                let req = RouteRequest::new(8, Weather::Rain, policy, hood.id).unwrap();
                let outcome = planner.plan(&req).unwrap();
                let route = outcome.route().expect("default town is connected");
                assert_eq!(route.path.first(), Some(&route.origin_node));
                assert_eq!(route.path.last(), Some(&planner.destination_node()));
                assert_eq!(route.roads.len() + 1, route.path.len());
                for w in route.path.windows(2) {
                    assert_eq!(w[0].manhattan(w[1]), 1);
                }
                if policy == RoutePolicy::ShortestDistance {
                    assert!((route.cost - route.length_km).abs() < 1e-9);
                }
                assert!(route.travel_time_h > 0.0 || route.path.len() == 1);
            }
        }
    }

    #[test]
    fn time_policy_cost_is_travel_time() {
        let config = CityConfig::default();
        let roads = vec![segment(0, (0, 0), (1, 0)), segment(1, (1, 0), (2, 0))];
        let town = topology(roads, p(0, 1), p(2, 1));
        let est = ConstEstimator::new(20.0);
        let planner = RoutePlanner::new(&config, &town, &est).unwrap();
        let req = RouteRequest::new(12, Weather::Clear, RoutePolicy::LeastCongestion, NeighborhoodId(0)).unwrap();
        let RouteOutcome::Found(route) = planner.plan(&req).unwrap() else {
            panic!("expected a route");
        };
        assert_eq!(route.path, vec![p(0, 0), p(1, 0), p(2, 0)]);
        assert!((route.cost - 0.2 / 20.0).abs() < 1e-12);
        assert!((route.travel_time_h - route.cost).abs() < 1e-12);
        assert!((route.length_km - 0.2).abs() < 1e-12);
    }

    #[test]
    fn unreachable_destination_is_no_route() {
        let config = CityConfig::default();
        let roads = vec![segment(0, (0, 0), (1, 0)), segment(1, (10, 10), (11, 10))];
        let town = topology(roads, p(0, 1), p(11, 11));
        let est = ConstEstimator::new(30.0);
        let planner = RoutePlanner::new(&config, &town, &est).unwrap();
        let req = RouteRequest::new(8, Weather::Clear, RoutePolicy::Balanced, NeighborhoodId(0)).unwrap();
        assert_eq!(
            planner.plan(&req).unwrap(),
            RouteOutcome::NoRoute { from: p(0, 0), to: p(11, 10) }
        );
    }

    #[test]
    fn unknown_neighborhood_and_empty_network() {
        let config = CityConfig::default();
        let est = ConstEstimator::new(30.0);

        let town = topology(vec![segment(0, (0, 0), (1, 0))], p(0, 1), p(1, 1));
        let planner = RoutePlanner::new(&config, &town, &est).unwrap();
        let req = RouteRequest::new(8, Weather::Clear, RoutePolicy::Balanced, NeighborhoodId(9)).unwrap();
        assert!(matches!(planner.plan(&req), Err(RoutingError::UnknownNeighborhood(id)) if id.0 == 9));

        let empty = topology(Vec::new(), p(0, 1), p(1, 1));
        assert!(matches!(
            RoutePlanner::new(&config, &empty, &est),
            Err(RoutingError::EmptyNetwork)
        ));
    }
}
