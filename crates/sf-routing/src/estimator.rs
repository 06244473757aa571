//! Speed estimators.
//!
//! The routing engine treats speed prediction as a black box behind
//! [`SpeedEstimator`]: it hands over a [`FeatureRecord`], the estimator
//! aligns it to its own trained schema and returns one speed in km/h.
//!
//! | Type                 | Source of predictions                           |
//! |----------------------|-------------------------------------------------|
//! | [`LinearSpeedModel`] | Intercept + per-column coefficients, from JSON  |
//! | [`RuleSpeedModel`]   | Expected value of the telemetry speed rule      |
//! | [`CachedEstimator`]  | Memoises any estimator by aligned input         |

use std::path::Path;
use std::sync::Mutex;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use sf_core::{CityConfig, HourOfDay, TelemetryConfig};
use sf_telemetry::{ScoringRules, time_multiplier};

use crate::{FeatureRecord, FeatureSchema, RoutingError, RoutingResult};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// A trained speed regression.
///
/// Implementations must be `Send + Sync` so one estimator can serve many
/// concurrent route requests.
pub trait SpeedEstimator: Send + Sync {
    /// The columns `predict` expects, in order.
    fn schema(&self) -> &FeatureSchema;

    /// Predict from an input already aligned to [`schema`](Self::schema).
    fn predict(&self, aligned: &[f64]) -> f64;

    /// Align `record` and predict.  This is the only entry point the
    /// routing engine uses.
    fn estimate(&self, record: &FeatureRecord) -> f64 {
        let x = self.schema().align(record);
        self.predict(&x)
    }
}

// ── LinearSpeedModel ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LinearModelFile {
    intercept:    f64,
    coefficients: Vec<Coefficient>,
}

#[derive(Deserialize)]
struct Coefficient {
    column: String,
    weight: f64,
}

/// `speed = intercept + Σ weight_i × x_i`.
///
/// # JSON format
///
/// ```json
/// {
///   "intercept": 31.5,
///   "coefficients": [
///     { "column": "hour", "weight": -0.12 },
///     { "column": "weather_condition_rain", "weight": -2.4 }
///   ]
/// }
/// ```
///
/// The coefficient columns, in file order, are the trained schema.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSpeedModel {
    intercept: f64,
    weights:   Vec<f64>,
    schema:    FeatureSchema,
}

impl LinearSpeedModel {
    pub fn new(intercept: f64, coefficients: Vec<(String, f64)>) -> Self {
        let (columns, weights): (Vec<String>, Vec<f64>) = coefficients.into_iter().unzip();
        Self { intercept, weights, schema: FeatureSchema::new(columns) }
    }

    /// Mark columns that may be absent from a record without a warning.
    pub fn with_optional<I, S>(mut self, optional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema = self.schema.with_optional(optional);
        self
    }

    pub fn from_json_str(s: &str) -> RoutingResult<Self> {
        let file: LinearModelFile = serde_json::from_str(s)?;
        if !file.intercept.is_finite() {
            return Err(RoutingError::Model("intercept is not finite".into()));
        }
        if let Some(c) = file.coefficients.iter().find(|c| !c.weight.is_finite()) {
            return Err(RoutingError::Model(format!("coefficient {:?} is not finite", c.column)));
        }
        Ok(Self::new(
            file.intercept,
            file.coefficients.into_iter().map(|c| (c.column, c.weight)).collect(),
        ))
    }

    pub fn from_json_file(path: &Path) -> RoutingResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl SpeedEstimator for LinearSpeedModel {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, aligned: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(aligned)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

// ── RuleSpeedModel ────────────────────────────────────────────────────────────

/// Predicts the expected `average_speed` of the telemetry simulator.
///
/// Reads `hour`, `speed_limit`, `neighborhood_population` and
/// `working_population_pct`, and applies the simulator's volume and speed
/// rules with the mean of the volume noise in place of a draw.  Used when no
/// trained model is available.
pub struct RuleSpeedModel {
    rules:      ScoringRules,
    mean_noise: f64,
    schema:     FeatureSchema,
}

const RULE_COLUMNS: [&str; 4] = [
    "hour",
    "speed_limit",
    "neighborhood_population",
    "working_population_pct",
];

impl RuleSpeedModel {
    pub fn new(telemetry: &TelemetryConfig) -> Self {
        let (lo, hi) = telemetry.volume_noise;
        Self {
            rules:      ScoringRules::from(telemetry),
            mean_noise: (lo as f64 + hi as f64) / 2.0,
            schema:     FeatureSchema::new(RULE_COLUMNS),
        }
    }

    pub fn from_config(config: &CityConfig) -> Self {
        Self::new(&config.telemetry)
    }
}

impl SpeedEstimator for RuleSpeedModel {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, aligned: &[f64]) -> f64 {
        let &[hour, limit, population, pct] = aligned else {
            return self.rules.min_sample_speed;
        };
        let hour = HourOfDay::new(hour.clamp(0.0, 23.0) as u8).unwrap_or_default();
        let working = population * pct;
        let volume = (working / self.rules.volume_scale) * time_multiplier(hour) + self.mean_noise;
        (limit - self.rules.speed_per_vehicle * volume).max(self.rules.min_sample_speed)
    }
}

// ── CachedEstimator ───────────────────────────────────────────────────────────

/// Memoises an inner estimator by aligned input vector.
///
/// Every segment of a request usually shares most features, and repeated
/// requests for the same (hour, weather) produce identical inputs, so the
/// cache stays small.  Keys are the bit patterns of the aligned values.
pub struct CachedEstimator<E> {
    inner: E,
    cache: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    map:  FxHashMap<Vec<u64>, f64>,
    hits: u64,
}

impl<E: SpeedEstimator> CachedEstimator<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, cache: Mutex::new(CacheState::default()) }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Number of distinct inputs cached so far.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.cache.lock().map(|c| c.hits).unwrap_or(0)
    }
}

impl<E: SpeedEstimator> SpeedEstimator for CachedEstimator<E> {
    fn schema(&self) -> &FeatureSchema {
        self.inner.schema()
    }

    fn predict(&self, aligned: &[f64]) -> f64 {
        let key: Vec<u64> = aligned.iter().map(|x| x.to_bits()).collect();
        // Poisoned lock: fall through to the inner estimator.
        if let Ok(mut state) = self.cache.lock() {
            if let Some(&v) = state.map.get(&key) {
                state.hits += 1;
                return v;
            }
        }
        let v = self.inner.predict(aligned);
        if let Ok(mut state) = self.cache.lock() {
            state.map.insert(key, v);
        }
        v
    }
}
