//! Run configuration.
//!
//! [`CityConfig`] is built once at startup (from defaults or a JSON file in
//! the application crate) and passed by reference into every component
//! constructor.  Nothing mutates it afterwards.
//!
//! With the `serde` feature every struct is `#[serde(default)]`, so a config
//! file only needs to name the fields it overrides:
//!
//! ```json
//! { "seed": 7, "telemetry": { "days": 2, "weather_scope": "per_sample" } }
//! ```

use crate::{CoreError, CoreResult, GridPos};

/// Upper bound on `CityConfig::meters_per_cell` (10 km per cell).
pub const MAX_METERS_PER_CELL: u32 = 10_000;

// ── CityConfig ────────────────────────────────────────────────────────────────

/// Top-level immutable configuration of one SafeFlow run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CityConfig {
    /// Side length of the square town lattice, in cells.
    pub grid_size: u32,

    /// Master RNG seed.  The same seed always produces identical topology
    /// and telemetry.
    pub seed: u64,

    /// Fixed routing destination (the school).  Resolved to the nearest road
    /// node once per topology.
    pub destination: GridPos,

    /// Physical length of every road segment, in km.
    pub segment_length_km: f64,

    /// Metres per lattice cell, used to express distance-to-destination.
    pub meters_per_cell: u32,

    pub telemetry: TelemetryConfig,
    pub routing:   RoutingConfig,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            grid_size:         20,
            seed:              42,
            destination:       GridPos::new(14, 18),
            segment_length_km: 0.1,
            meters_per_cell:   100,
            telemetry:         TelemetryConfig::default(),
            routing:           RoutingConfig::default(),
        }
    }
}

impl CityConfig {
    /// Reject configurations no component can run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_size == 0 {
            return Err(CoreError::Config("grid_size must be positive".into()));
        }
        if !self.destination.in_bounds(self.grid_size) {
            return Err(CoreError::Config(format!(
                "destination {} outside {}x{} grid",
                self.destination, self.grid_size, self.grid_size
            )));
        }
        if !(self.segment_length_km.is_finite() && self.segment_length_km > 0.0) {
            return Err(CoreError::Config(format!(
                "segment_length_km must be positive, got {}",
                self.segment_length_km
            )));
        }
        if !(1..=MAX_METERS_PER_CELL).contains(&self.meters_per_cell) {
            return Err(CoreError::Config(format!(
                "meters_per_cell must be in 1..={MAX_METERS_PER_CELL}, got {}",
                self.meters_per_cell
            )));
        }
        self.telemetry.validate()?;
        self.routing.validate()
    }
}

// ── Telemetry ─────────────────────────────────────────────────────────────────

/// Where the speed limit used for a sample's average speed comes from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum SpeedLimitMode {
    /// Use the segment's posted limit, or `default` when it has none.
    Posted { default: u8 },
    /// Draw one limit per sample from `choices`.  The drawn value is both the
    /// reported `speed_limit` column and the base of `average_speed`.
    Redraw { choices: Vec<u8> },
}

/// How often the weather is drawn during corpus generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeatherScope {
    /// One draw per (day, window), shared by every sample in it.
    #[default]
    PerWindow,
    /// A fresh draw for every sample.
    PerSample,
}

/// Categorical weights of the weather draw.  Need not sum to one.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeatherWeights {
    pub clear: f64,
    pub rain:  f64,
    pub fog:   f64,
}

impl Default for WeatherWeights {
    fn default() -> Self {
        Self { clear: 0.65, rain: 0.25, fog: 0.10 }
    }
}

impl WeatherWeights {
    pub fn total(&self) -> f64 {
        self.clear + self.rain + self.fog
    }
}

/// Parameters of the synthetic telemetry rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TelemetryConfig {
    /// School days simulated (day indices `0..days`).
    pub days: u8,
    /// Time windows per day.  48 = half-hour windows.
    pub windows_per_day: u8,
    /// Neighborhood samples drawn per (day, window, segment).
    pub samples_per_segment: u8,
    /// Divisor K of the working population in the volume formula.
    pub volume_scale: f64,
    /// Inclusive range of the additive uniform volume noise.
    pub volume_noise: (u32, u32),
    /// `[medium_from, high_from]`: volume < medium_from is LOW, < high_from
    /// is MEDIUM, otherwise HIGH.
    pub congestion_thresholds: [u32; 2],
    /// `[low_max, medium_max]`: score ≤ low_max is LOW, ≤ medium_max is
    /// MEDIUM, otherwise HIGH.
    pub risk_thresholds: [i32; 2],
    /// Speed lost per vehicle of traffic volume.
    pub speed_per_vehicle: f64,
    /// Floor of a sample's average speed.
    pub min_sample_speed: f64,
    pub speed_limit_mode: SpeedLimitMode,
    /// Lane counts drawn for segments that do not fix one.
    pub lane_choices: Vec<u8>,
    /// Probability that a sample reports a crosswalk.
    pub crosswalk_probability: f64,
    pub weather_weights: WeatherWeights,
    pub weather_scope: WeatherScope,
    /// Recorded in every sample; every simulated day is a school day.
    pub school_day: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            days:                  5,
            windows_per_day:       48,
            samples_per_segment:   2,
            volume_scale:          150.0,
            volume_noise:          (5, 20),
            congestion_thresholds: [40, 75],
            risk_thresholds:       [3, 6],
            speed_per_vehicle:     0.25,
            min_sample_speed:      10.0,
            speed_limit_mode:      SpeedLimitMode::Redraw { choices: vec![25, 30, 35, 40] },
            lane_choices:          vec![1, 2, 3],
            crosswalk_probability: 0.5,
            weather_weights:       WeatherWeights::default(),
            weather_scope:         WeatherScope::PerWindow,
            school_day:            true,
        }
    }
}

impl TelemetryConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.windows_per_day == 0 {
            return Err(CoreError::Config("windows_per_day must be positive".into()));
        }
        if !(self.volume_scale.is_finite() && self.volume_scale > 0.0) {
            return Err(CoreError::Config(format!(
                "volume_scale must be positive, got {}",
                self.volume_scale
            )));
        }
        if self.volume_noise.0 > self.volume_noise.1 {
            return Err(CoreError::Config(format!(
                "volume_noise range {:?} is empty",
                self.volume_noise
            )));
        }
        if self.congestion_thresholds[0] > self.congestion_thresholds[1] {
            return Err(CoreError::Config("congestion_thresholds must be ascending".into()));
        }
        if self.risk_thresholds[0] > self.risk_thresholds[1] {
            return Err(CoreError::Config("risk_thresholds must be ascending".into()));
        }
        if matches!(&self.speed_limit_mode, SpeedLimitMode::Redraw { choices } if choices.is_empty()) {
            return Err(CoreError::Config("speed limit choices must not be empty".into()));
        }
        if self.lane_choices.is_empty() {
            return Err(CoreError::Config("lane_choices must not be empty".into()));
        }
        let w = &self.weather_weights;
        if [w.clear, w.rain, w.fog].iter().any(|v| !v.is_finite() || *v < 0.0) || w.total() <= 0.0 {
            return Err(CoreError::Config(format!("invalid weather weights {w:?}")));
        }
        Ok(())
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

/// What the graph builder does when two segments join the same node pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeMerge {
    /// The later segment's weight replaces the earlier one.
    #[default]
    Overwrite,
    /// Keep the smaller weight.
    KeepMinimum,
}

/// Parameters of the request-time routing engine.
///
/// The `day_of_week` .. `students` fields are the fixed context placed in
/// every feature record sent to the speed estimator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Predicted speeds are clamped up to this floor before use.
    pub min_speed: f64,
    /// Share of distance in the balanced policy; the rest is travel time.
    pub balanced_distance_share: f64,
    pub day_of_week: u8,
    pub school_day: bool,
    pub lanes: u8,
    pub speed_limit: u8,
    pub population: u32,
    pub working_population_pct: f64,
    pub students: u32,
    pub edge_merge: EdgeMerge,
    /// Estimator columns that may be absent from a feature record without a
    /// schema-drift warning.
    pub optional_columns: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_speed:               5.0,
            balanced_distance_share: 0.5,
            day_of_week:             1,
            school_day:              true,
            lanes:                   2,
            speed_limit:             30,
            population:              5_000,
            working_population_pct:  0.6,
            students:                800,
            edge_merge:              EdgeMerge::Overwrite,
            optional_columns:        Vec::new(),
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.min_speed.is_finite() && self.min_speed > 0.0) {
            return Err(CoreError::Config(format!(
                "min_speed must be positive, got {}",
                self.min_speed
            )));
        }
        if !(0.0..=1.0).contains(&self.balanced_distance_share) {
            return Err(CoreError::Config(format!(
                "balanced_distance_share must be in [0, 1], got {}",
                self.balanced_distance_share
            )));
        }
        Ok(())
    }
}
