//! Route policies and the edge-weight rule.

use std::fmt;
use std::str::FromStr;

use sf_core::RoutingConfig;

use crate::RoutingError;

/// What a route minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RoutePolicy {
    /// Total segment length.
    ShortestDistance,
    /// Total predicted travel time.
    LeastCongestion,
    /// A weighted blend of length and travel time.
    Balanced,
}

impl RoutePolicy {
    pub const ALL: [RoutePolicy; 3] = [
        RoutePolicy::ShortestDistance,
        RoutePolicy::LeastCongestion,
        RoutePolicy::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoutePolicy::ShortestDistance => "shortest-distance",
            RoutePolicy::LeastCongestion  => "least-congestion",
            RoutePolicy::Balanced         => "balanced",
        }
    }
}

/// Accepts `shortest-distance`, `shortest_distance`, `Shortest distance`
/// and the short forms `distance`, `time`.
impl FromStr for RoutePolicy {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        match norm.as_str() {
            "shortest-distance" | "distance" => Ok(RoutePolicy::ShortestDistance),
            "least-congestion" | "time"      => Ok(RoutePolicy::LeastCongestion),
            "balanced"                       => Ok(RoutePolicy::Balanced),
            _ => Err(RoutingError::InvalidPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for RoutePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── WeightPolicy ──────────────────────────────────────────────────────────────

/// Converts a segment length and a predicted speed into an edge weight.
///
/// Predicted speeds below `min_speed` are raised to it before use, so travel
/// time is always finite and positive for a positive length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightPolicy {
    pub min_speed:      f64,
    pub distance_share: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy::from(&RoutingConfig::default())
    }
}

impl From<&RoutingConfig> for WeightPolicy {
    fn from(c: &RoutingConfig) -> Self {
        Self {
            min_speed:      c.min_speed,
            distance_share: c.balanced_distance_share,
        }
    }
}

impl WeightPolicy {
    /// The speed actually used for `predicted`.  NaN predictions fall to
    /// the floor too.
    #[inline]
    pub fn effective_speed(&self, predicted: f64) -> f64 {
        if predicted >= self.min_speed { predicted } else { self.min_speed }
    }

    /// Hours to cover `distance_km` at the effective speed.
    #[inline]
    pub fn travel_time(&self, distance_km: f64, predicted: f64) -> f64 {
        distance_km / self.effective_speed(predicted)
    }

    pub fn weight(&self, distance_km: f64, predicted: f64, policy: RoutePolicy) -> f64 {
        match policy {
            RoutePolicy::ShortestDistance => distance_km,
            RoutePolicy::LeastCongestion => self.travel_time(distance_km, predicted),
            RoutePolicy::Balanced => {
                self.distance_share * distance_km
                    + (1.0 - self.distance_share) * self.travel_time(distance_km, predicted)
            }
        }
    }
}
