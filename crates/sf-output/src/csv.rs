//! CSV output backend.
//!
//! Creates three files in the output directory:
//! - `roads.csv`
//! - `neighborhoods.csv`
//! - `telemetry.csv`, the training corpus
//!
//! `roads.csv` and `neighborhoods.csv` load back through `sf_grid::loader`.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use sf_telemetry::{COLUMNS, TelemetrySample};

use crate::row::{NEIGHBORHOOD_COLUMNS, ROAD_COLUMNS};
use crate::writer::OutputWriter;
use crate::{NeighborhoodRow, OutputResult, RoadRow};

pub const ROADS_FILE:         &str = "roads.csv";
pub const NEIGHBORHOODS_FILE: &str = "neighborhoods.csv";
pub const TELEMETRY_FILE:     &str = "telemetry.csv";

/// Writes topology and corpus output to CSV files.
pub struct CsvWriter {
    roads:         Writer<File>,
    neighborhoods: Writer<File>,
    telemetry:     Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write their header rows.
    /// Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut roads = Writer::from_path(dir.join(ROADS_FILE))?;
        roads.write_record(ROAD_COLUMNS)?;

        let mut neighborhoods = Writer::from_path(dir.join(NEIGHBORHOODS_FILE))?;
        neighborhoods.write_record(NEIGHBORHOOD_COLUMNS)?;

        let mut telemetry = Writer::from_path(dir.join(TELEMETRY_FILE))?;
        telemetry.write_record(COLUMNS)?;

        log::debug!("csv output in {}", dir.display());
        Ok(Self {
            roads,
            neighborhoods,
            telemetry,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_roads(&mut self, rows: &[RoadRow]) -> OutputResult<()> {
        for row in rows {
            self.roads.write_record(row.to_record())?;
        }
        Ok(())
    }

    fn write_neighborhoods(&mut self, rows: &[NeighborhoodRow]) -> OutputResult<()> {
        for row in rows {
            self.neighborhoods.write_record(row.to_record())?;
        }
        Ok(())
    }

    fn write_samples(&mut self, samples: &[TelemetrySample]) -> OutputResult<()> {
        for sample in samples {
            self.telemetry.write_record(sample.to_record())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.roads.flush()?;
        self.neighborhoods.flush()?;
        self.telemetry.flush()?;
        Ok(())
    }
}
