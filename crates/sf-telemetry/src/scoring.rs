//! Deterministic scoring rules.
//!
//! Everything here is a pure function of its inputs.  Randomness (the volume
//! noise, the speed-limit draw) is sampled by the caller and passed in, so
//! the rules can be tested exhaustively without an RNG.

use sf_core::{CongestionLevel, HourOfDay, RiskLevel, TelemetryConfig};

/// Multiplier applied to base traffic volume for a given hour.
///
/// | Hours             | Multiplier |
/// |-------------------|------------|
/// | 7–9 (arrival)     | 1.8        |
/// | 14–16 (dismissal) | 1.7        |
/// | other 6–19        | 1.2        |
/// | night             | 0.6        |
pub fn time_multiplier(hour: HourOfDay) -> f64 {
    if hour.is_arrival_peak() {
        1.8
    } else if hour.is_dismissal_peak() {
        1.7
    } else if hour.is_daytime() {
        1.2
    } else {
        0.6
    }
}

/// Scalar parameters of the scoring rules, copied out of [`TelemetryConfig`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoringRules {
    pub volume_scale:          f64,
    pub congestion_thresholds: [u32; 2],
    pub risk_thresholds:       [i32; 2],
    pub speed_per_vehicle:     f64,
    pub min_sample_speed:      f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules::from(&TelemetryConfig::default())
    }
}

impl From<&TelemetryConfig> for ScoringRules {
    fn from(c: &TelemetryConfig) -> Self {
        Self {
            volume_scale:          c.volume_scale,
            congestion_thresholds: c.congestion_thresholds,
            risk_thresholds:       c.risk_thresholds,
            speed_per_vehicle:     c.speed_per_vehicle,
            min_sample_speed:      c.min_sample_speed,
        }
    }
}

impl ScoringRules {
    /// `floor(working_population / K × multiplier + noise)`, never negative.
    pub fn traffic_volume(&self, working_population: f64, multiplier: f64, noise: u32) -> u32 {
        let v = (working_population / self.volume_scale) * multiplier + noise as f64;
        if v.is_finite() && v > 0.0 { v.floor() as u32 } else { 0 }
    }

    pub fn congestion(&self, volume: u32) -> CongestionLevel {
        let [medium_from, high_from] = self.congestion_thresholds;
        if volume < medium_from {
            CongestionLevel::Low
        } else if volume < high_from {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        }
    }

    /// Unbounded integer risk score.  Can be negative only with custom
    /// congestion weights; labelling handles any value.
    pub fn risk_score(
        &self,
        congestion:      CongestionLevel,
        precipitation:   bool,
        is_intersection: bool,
        crossing_guard:  bool,
    ) -> i32 {
        congestion.risk_weight()
            + 2 * precipitation as i32
            + 2 * is_intersection as i32
            - crossing_guard as i32
    }

    pub fn risk_level(&self, score: i32) -> RiskLevel {
        let [low_max, medium_max] = self.risk_thresholds;
        if score <= low_max {
            RiskLevel::Low
        } else if score <= medium_max {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// `max(floor, speed_limit − per_vehicle × volume)`, rounded to one
    /// decimal like the corpus column.
    pub fn average_speed(&self, speed_limit: u8, volume: u32) -> f64 {
        let raw = speed_limit as f64 - self.speed_per_vehicle * volume as f64;
        (raw.max(self.min_sample_speed) * 10.0).round() / 10.0
    }
}
