//! Speed-estimator feature records.
//!
//! A [`FeatureRecord`] is an ordered list of named values, numeric or
//! categorical.  [`FeatureRecord::encode`] expands categoricals into
//! indicator columns named `<column>_<value>` (e.g.
//! `weather_condition_rain`), the convention of the training corpus.  The
//! encoded record is then aligned to the estimator's trained column list by
//! [`FeatureSchema::align`](crate::FeatureSchema::align).

use sf_core::{CityConfig, HourOfDay, Weather};
use sf_grid::RoadSegment;
use sf_telemetry::TelemetrySample;

#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Num(f64),
    Cat(&'static str),
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Num(if b { 1.0 } else { 0.0 })
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Num(v)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        FeatureValue::Num(v as f64)
    }
}

impl From<u8> for FeatureValue {
    fn from(v: u8) -> Self {
        FeatureValue::Num(v as f64)
    }
}

/// One estimator input, before encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.  Setting a name twice replaces the earlier value.
    pub fn set(&mut self, name: &'static str, value: impl Into<FeatureValue>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the categorical fields, in insertion order.
    pub fn categorical_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, v)| matches!(v, FeatureValue::Cat(_)))
            .map(|(n, _)| *n)
    }

    /// Numeric fields keep their name; categorical `c = v` becomes `c_v = 1`.
    pub fn encode(&self) -> Vec<(String, f64)> {
        self.fields
            .iter()
            .map(|(name, value)| match value {
                FeatureValue::Num(x) => ((*name).to_owned(), *x),
                FeatureValue::Cat(v) => (format!("{name}_{v}"), 1.0),
            })
            .collect()
    }

    // ── Constructors ──────────────────────────────────────────────────────

    /// The request-time record of one segment.
    ///
    /// Hour and weather come from the request, distance and intersection
    /// flag from the segment, and every other context field from the
    /// placeholders in `RoutingConfig`.
    pub fn for_route(
        config:  &CityConfig,
        segment: &RoadSegment,
        hour:    HourOfDay,
        weather: Weather,
    ) -> Self {
        let r = &config.routing;
        let to_school = segment.to.manhattan(config.destination).saturating_mul(config.meters_per_cell);
        let mut rec = FeatureRecord::new();
        rec.set("hour", hour.get())
            .set("day_of_week", r.day_of_week)
            .set("is_school_day", r.school_day)
            .set("is_arrival_time", hour.is_arrival_peak())
            .set("is_dismissal_time", hour.is_dismissal_peak())
            .set("weather_condition", FeatureValue::Cat(weather.as_str()))
            .set("precipitation", weather.precipitation())
            .set("visibility_level", FeatureValue::Cat(weather.visibility().as_str()))
            .set("num_lanes", r.lanes)
            .set("speed_limit", r.speed_limit)
            .set("distance_km", segment.length_km)
            .set("is_intersection", segment.is_intersection)
            .set("neighborhood_population", r.population)
            .set("working_population_pct", r.working_population_pct)
            .set("students_population", r.students)
            .set("distance_to_school_m", to_school);
        rec
    }

    /// The record a training pipeline would build from a corpus row.  Label
    /// and identifier columns are left out.
    pub fn from_sample(s: &TelemetrySample) -> Self {
        let mut rec = FeatureRecord::new();
        rec.set("hour", s.hour.get())
            .set("day_of_week", s.day_of_week)
            .set("is_school_day", s.is_school_day)
            .set("is_arrival_time", s.is_arrival_time)
            .set("is_dismissal_time", s.is_dismissal_time)
            .set("weather_condition", FeatureValue::Cat(s.weather_condition.as_str()))
            .set("precipitation", s.precipitation)
            .set("visibility_level", FeatureValue::Cat(s.visibility_level.as_str()))
            .set("num_lanes", s.num_lanes)
            .set("speed_limit", s.speed_limit)
            .set("distance_km", s.distance_km)
            .set("is_intersection", s.is_intersection)
            .set("neighborhood_population", s.neighborhood_population)
            .set("working_population_pct", s.working_population_pct)
            .set("students_population", s.students_population)
            .set("distance_to_school_m", s.distance_to_school_m)
            .set("crosswalk_present", s.crosswalk_present)
            .set("crossing_guard_present", s.crossing_guard_present);
        rec
    }
}
