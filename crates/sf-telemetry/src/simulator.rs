//! Per-sample synthesis.

use sf_core::{CityConfig, SpeedLimitMode, TaskRng, Weather, WeatherWeights};
use sf_grid::{Neighborhood, RoadSegment};

use crate::scoring::{ScoringRules, time_multiplier};
use crate::{TelemetrySample, WindowConditions};

/// Categorical weather draw.  One uniform draw per call.
pub fn draw_weather(weights: &WeatherWeights, rng: &mut TaskRng) -> Weather {
    pick_weather(weights, rng.random::<f64>() * weights.total())
}

/// Weather for a point `r` in `[0, weights.total())`: clear, rain and fog
/// occupy consecutive intervals in that order.
pub fn pick_weather(weights: &WeatherWeights, r: f64) -> Weather {
    if r < weights.clear {
        Weather::Clear
    } else if r < weights.clear + weights.rain {
        Weather::Rain
    } else {
        Weather::Fog
    }
}

/// Builds [`TelemetrySample`]s from a segment, a neighborhood and the
/// window's conditions.
///
/// The simulator holds no mutable state; all randomness comes from the
/// caller's stream.  Draws are taken in this fixed order: volume noise,
/// speed limit (`Redraw` mode only), lane count (segments without one),
/// crosswalk.
pub struct TelemetrySimulator<'a> {
    config: &'a CityConfig,
    rules:  ScoringRules,
}

impl<'a> TelemetrySimulator<'a> {
    pub fn new(config: &'a CityConfig) -> Self {
        Self {
            config,
            rules: ScoringRules::from(&config.telemetry),
        }
    }

    #[inline]
    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn draw_weather(&self, rng: &mut TaskRng) -> Weather {
        draw_weather(&self.config.telemetry.weather_weights, rng)
    }

    pub fn simulate(
        &self,
        conditions:   WindowConditions,
        segment:      &RoadSegment,
        neighborhood: &Neighborhood,
        rng:          &mut TaskRng,
    ) -> TelemetrySample {
        let t = &self.config.telemetry;
        let hour = conditions.hour();
        let weather = conditions.weather;

        let noise = rng.gen_range(t.volume_noise.0..=t.volume_noise.1);
        let volume = self.rules.traffic_volume(
            neighborhood.working_population(),
            time_multiplier(hour),
            noise,
        );

        let speed_limit = match &t.speed_limit_mode {
            SpeedLimitMode::Posted { default } => segment.speed_limit.unwrap_or(*default),
            SpeedLimitMode::Redraw { choices } => rng.choose(choices).copied().unwrap_or(0),
        };
        let num_lanes = match segment.lanes {
            Some(l) => l,
            None    => rng.choose(&t.lane_choices).copied().unwrap_or(1),
        };
        let crosswalk_present = rng.gen_bool(t.crosswalk_probability);

        let guard = hour.crossing_guard_on_duty();
        let congestion = self.rules.congestion(volume);
        let score = self.rules.risk_score(
            congestion,
            weather.precipitation(),
            segment.is_intersection,
            guard,
        );

        let distance_cells = segment.to.manhattan(self.config.destination);

        TelemetrySample {
            hour,
            day_of_week:             conditions.window.day,
            is_school_day:           t.school_day,
            is_arrival_time:         hour.is_arrival_peak(),
            is_dismissal_time:       hour.is_dismissal_peak(),
            weather_condition:       weather,
            precipitation:           weather.precipitation(),
            visibility_level:        weather.visibility(),
            road_id:                 segment.id,
            start_node:              segment.from,
            end_node:                segment.to,
            num_lanes,
            speed_limit,
            distance_km:             segment.length_km,
            is_intersection:         segment.is_intersection,
            neighborhood_id:         neighborhood.id,
            neighborhood_population: neighborhood.population,
            working_population_pct:  neighborhood.working_population_pct,
            students_population:     neighborhood.students,
            distance_to_school_m:    distance_cells.saturating_mul(self.config.meters_per_cell),
            crosswalk_present,
            crossing_guard_present:  guard,
            traffic_volume:          volume,
            average_speed:           self.rules.average_speed(speed_limit, volume),
            congestion_level:        congestion,
            accident_risk:           self.rules.risk_level(score),
        }
    }
}
