//! The corpus row type.

use sf_core::{
    CongestionLevel, GridPos, HourOfDay, NeighborhoodId, RiskLevel, RoadId, TimeWindow, Visibility,
    Weather,
};

/// Calendar and weather context shared by the samples of one draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WindowConditions {
    pub window:  TimeWindow,
    pub weather: Weather,
}

impl WindowConditions {
    pub fn new(window: TimeWindow, weather: Weather) -> Self {
        Self { window, weather }
    }

    #[inline]
    pub fn hour(&self) -> HourOfDay {
        self.window.hour()
    }
}

/// Column names of the training corpus, in file order.
pub const COLUMNS: [&str; 26] = [
    "hour",
    "day_of_week",
    "is_school_day",
    "is_arrival_time",
    "is_dismissal_time",
    "weather_condition",
    "precipitation",
    "visibility_level",
    "road_id",
    "start_node",
    "end_node",
    "num_lanes",
    "speed_limit",
    "distance_km",
    "is_intersection",
    "neighborhood_id",
    "neighborhood_population",
    "working_population_pct",
    "students_population",
    "distance_to_school_m",
    "crosswalk_present",
    "crossing_guard_present",
    "traffic_volume",
    "average_speed",
    "congestion_level",
    "accident_risk",
];

/// One synthetic observation of one road segment.  Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetrySample {
    pub hour:                    HourOfDay,
    pub day_of_week:             u8,
    pub is_school_day:           bool,
    pub is_arrival_time:         bool,
    pub is_dismissal_time:       bool,
    pub weather_condition:       Weather,
    pub precipitation:           bool,
    pub visibility_level:        Visibility,
    pub road_id:                 RoadId,
    pub start_node:              GridPos,
    pub end_node:                GridPos,
    pub num_lanes:               u8,
    pub speed_limit:             u8,
    pub distance_km:             f64,
    pub is_intersection:         bool,
    pub neighborhood_id:         NeighborhoodId,
    pub neighborhood_population: u32,
    pub working_population_pct:  f64,
    pub students_population:     u32,
    pub distance_to_school_m:    u32,
    pub crosswalk_present:       bool,
    pub crossing_guard_present:  bool,
    pub traffic_volume:          u32,
    pub average_speed:           f64,
    pub congestion_level:        CongestionLevel,
    pub accident_risk:           RiskLevel,
}

impl TelemetrySample {
    /// Field values as strings, in [`COLUMNS`] order.  Booleans are written
    /// as `0`/`1` and labels in upper case, matching the training corpus.
    pub fn to_record(&self) -> Vec<String> {
        let b = |v: bool| if v { "1".to_owned() } else { "0".to_owned() };
        vec![
            self.hour.get().to_string(),
            self.day_of_week.to_string(),
            b(self.is_school_day),
            b(self.is_arrival_time),
            b(self.is_dismissal_time),
            self.weather_condition.as_str().to_owned(),
            b(self.precipitation),
            self.visibility_level.as_str().to_owned(),
            self.road_id.to_string(),
            self.start_node.to_string(),
            self.end_node.to_string(),
            self.num_lanes.to_string(),
            self.speed_limit.to_string(),
            format!("{:.2}", self.distance_km),
            b(self.is_intersection),
            self.neighborhood_id.to_string(),
            self.neighborhood_population.to_string(),
            self.working_population_pct.to_string(),
            self.students_population.to_string(),
            self.distance_to_school_m.to_string(),
            b(self.crosswalk_present),
            b(self.crossing_guard_present),
            self.traffic_volume.to_string(),
            format!("{:.1}", self.average_speed),
            self.congestion_level.as_str().to_owned(),
            self.accident_risk.as_str().to_owned(),
        ]
    }
}
