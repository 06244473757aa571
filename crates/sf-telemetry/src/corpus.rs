//! Batch corpus generation.

use sf_core::{CityConfig, CongestionLevel, RiskLevel, TaskRng, TimeWindow, WeatherScope};
use sf_grid::Topology;

use crate::{
    TelemetryError, TelemetryResult, TelemetrySample, TelemetrySimulator, WindowConditions,
};

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`CorpusGenerator::run`].
///
/// Windows are always delivered in chronological order, with the `parallel`
/// feature too.  All methods default to no-ops.
pub trait CorpusObserver {
    fn on_window(&mut self, _window: TimeWindow, _samples: &[TelemetrySample]) {}

    fn on_corpus_end(&mut self, _stats: &CorpusStats) {}
}

pub struct NoopObserver;

impl CorpusObserver for NoopObserver {}

/// Collects every sample in memory.
#[derive(Default)]
pub struct CollectObserver {
    pub samples: Vec<TelemetrySample>,
}

impl CorpusObserver for CollectObserver {
    fn on_window(&mut self, _window: TimeWindow, samples: &[TelemetrySample]) {
        self.samples.extend_from_slice(samples);
    }
}

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Summary of a generated corpus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorpusStats {
    pub samples:    usize,
    pub windows:    usize,
    /// Counts indexed by `CongestionLevel as usize` (LOW, MEDIUM, HIGH).
    pub congestion: [usize; 3],
    /// Counts indexed by `RiskLevel as usize`.
    pub risk:       [usize; 3],
    speed_sum:      f64,
}

impl CorpusStats {
    pub fn record(&mut self, s: &TelemetrySample) {
        self.samples += 1;
        self.congestion[s.congestion_level as usize] += 1;
        self.risk[s.accident_risk as usize] += 1;
        self.speed_sum += s.average_speed;
    }

    pub fn mean_speed(&self) -> f64 {
        if self.samples == 0 { 0.0 } else { self.speed_sum / self.samples as f64 }
    }

    pub fn congestion_count(&self, level: CongestionLevel) -> usize {
        self.congestion[level as usize]
    }

    pub fn risk_count(&self, level: RiskLevel) -> usize {
        self.risk[level as usize]
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// Runs the simulator over every (day, window, segment, sample slot).
///
/// Each window draws from its own [`TaskRng`] keyed by
/// [`TimeWindow::ordinal`], so a window's samples depend only on the seed and
/// the topology.  Within a window the order is: weather (once, or per sample
/// under [`WeatherScope::PerSample`]), then for each segment in id order and
/// each slot, the neighborhood pick followed by the simulator's own draws.
pub struct CorpusGenerator<'a> {
    config:    &'a CityConfig,
    topology:  &'a Topology,
    simulator: TelemetrySimulator<'a>,
}

impl<'a> CorpusGenerator<'a> {
    pub fn new(config: &'a CityConfig, topology: &'a Topology) -> TelemetryResult<Self> {
        config.telemetry.validate()?;
        if topology.neighborhoods.is_empty() {
            return Err(TelemetryError::NoNeighborhoods);
        }
        Ok(Self {
            config,
            topology,
            simulator: TelemetrySimulator::new(config),
        })
    }

    pub fn windows(&self) -> impl Iterator<Item = TimeWindow> + use<> {
        let t = &self.config.telemetry;
        TimeWindow::week(t.days, t.windows_per_day)
    }

    /// Total samples a full run produces.
    pub fn expected_samples(&self) -> usize {
        let t = &self.config.telemetry;
        t.days as usize
            * t.windows_per_day as usize
            * self.topology.roads.len()
            * t.samples_per_segment as usize
    }

    /// All samples of one window.  Pure given the seed.
    pub fn simulate_window(&self, window: TimeWindow) -> Vec<TelemetrySample> {
        let t = &self.config.telemetry;
        let mut rng = TaskRng::new(self.config.seed, window.ordinal());
        let shared = self.simulator.draw_weather(&mut rng);

        let hoods = &self.topology.neighborhoods;
        let mut out = Vec::with_capacity(self.topology.roads.len() * t.samples_per_segment as usize);
        for segment in &self.topology.roads {
            for _ in 0..t.samples_per_segment {
                let weather = match t.weather_scope {
                    WeatherScope::PerWindow => shared,
                    WeatherScope::PerSample => self.simulator.draw_weather(&mut rng),
                };
                let idx = rng.gen_range(0..hoods.len());
                let conditions = WindowConditions::new(window, weather);
                out.push(self.simulator.simulate(conditions, segment, &hoods[idx], &mut rng));
            }
        }
        out
    }

    /// Generate the whole corpus, streaming each window to `observer`.
    pub fn run<O: CorpusObserver>(&self, observer: &mut O) -> CorpusStats {
        let mut stats = CorpusStats::default();
        let mut deliver = |window: TimeWindow, samples: &[TelemetrySample]| {
            samples.iter().for_each(|s| stats.record(s));
            stats.windows += 1;
            observer.on_window(window, samples);
        };

        #[cfg(not(feature = "parallel"))]
        {
            for window in self.windows() {
                let samples = self.simulate_window(window);
                deliver(window, &samples);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let windows: Vec<TimeWindow> = self.windows().collect();
            let batches: Vec<Vec<TelemetrySample>> = windows
                .par_iter()
                .map(|&w| self.simulate_window(w))
                .collect();
            for (window, samples) in windows.into_iter().zip(batches) {
                deliver(window, &samples);
            }
        }

        log::info!(
            "corpus: {} samples over {} windows; congestion L/M/H {:?}; risk L/M/H {:?}; mean speed {:.1}",
            stats.samples,
            stats.windows,
            stats.congestion,
            stats.risk,
            stats.mean_speed(),
        );
        observer.on_corpus_end(&stats);
        stats
    }

    /// Generate the whole corpus into memory.
    pub fn generate(&self) -> Vec<TelemetrySample> {
        let mut collect = CollectObserver { samples: Vec::with_capacity(self.expected_samples()) };
        self.run(&mut collect);
        collect.samples
    }
}
