//! The `OutputWriter` trait implemented by all backend writers.

use sf_grid::Topology;
use sf_telemetry::TelemetrySample;

use crate::{NeighborhoodRow, OutputResult, RoadRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    fn write_roads(&mut self, rows: &[RoadRow]) -> OutputResult<()>;

    fn write_neighborhoods(&mut self, rows: &[NeighborhoodRow]) -> OutputResult<()>;

    /// Append a batch of corpus rows.
    fn write_samples(&mut self, samples: &[TelemetrySample]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write a topology's roads and neighborhoods.
    fn write_topology(&mut self, topology: &Topology) -> OutputResult<()> {
        let roads: Vec<RoadRow> = topology.roads.iter().map(RoadRow::from).collect();
        let hoods: Vec<NeighborhoodRow> = topology.neighborhoods.iter().map(NeighborhoodRow::from).collect();
        self.write_roads(&roads)?;
        self.write_neighborhoods(&hoods)
    }
}
