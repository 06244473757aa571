//! `sf-output`: topology and corpus writers for the SafeFlow simulator.
//!
//! Two backends are provided:
//!
//! | Feature  | Backend | Files created                                       |
//! |----------|---------|-----------------------------------------------------|
//! | *(none)* | CSV     | `roads.csv`, `neighborhoods.csv`, `telemetry.csv`   |
//! | `sqlite` | SQLite  | `safeflow.db`                                       |
//!
//! Both implement [`OutputWriter`].  Corpus generation streams into a writer
//! through [`CorpusOutputObserver`], which implements
//! `sf_telemetry::CorpusObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sf_output::{CorpusOutputObserver, CsvWriter, OutputWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./out"))?;
//! writer.write_topology(&topology)?;
//! let mut obs = CorpusOutputObserver::new(writer);
//! generator.run(&mut obs);
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::CorpusOutputObserver;
pub use row::{NeighborhoodRow, RoadRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
