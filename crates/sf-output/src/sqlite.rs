//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `safeflow.db` file in the output directory with three
//! tables: `roads`, `neighborhoods` and `telemetry`.  Telemetry columns carry
//! the same names and encodings as `telemetry.csv`.

use std::path::Path;

use rusqlite::{Connection, params};
use sf_telemetry::TelemetrySample;

use crate::writer::OutputWriter;
use crate::{NeighborhoodRow, OutputResult, RoadRow};

pub const DB_FILE: &str = "safeflow.db";

/// Writes topology and corpus output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `safeflow.db` in `dir` and recreate its tables, so
    /// a rerun replaces earlier output like the CSV backend does.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DB_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS roads;
             DROP TABLE IF EXISTS neighborhoods;
             DROP TABLE IF EXISTS telemetry;
             CREATE TABLE roads (
                 road_id         INTEGER PRIMARY KEY,
                 street_name     TEXT    NOT NULL,
                 from_x          INTEGER NOT NULL,
                 from_y          INTEGER NOT NULL,
                 to_x            INTEGER NOT NULL,
                 to_y            INTEGER NOT NULL,
                 length_km       REAL    NOT NULL,
                 num_lanes       INTEGER,
                 speed_limit     INTEGER,
                 is_intersection INTEGER NOT NULL
             );
             CREATE TABLE neighborhoods (
                 neighborhood_id         INTEGER PRIMARY KEY,
                 display_name            TEXT    NOT NULL,
                 neighborhood_population INTEGER NOT NULL,
                 working_population_pct  REAL    NOT NULL,
                 students_population     INTEGER NOT NULL,
                 x                       INTEGER NOT NULL,
                 y                       INTEGER NOT NULL
             );
             CREATE TABLE telemetry (
                 hour                    INTEGER NOT NULL,
                 day_of_week             INTEGER NOT NULL,
                 is_school_day           INTEGER NOT NULL,
                 is_arrival_time         INTEGER NOT NULL,
                 is_dismissal_time       INTEGER NOT NULL,
                 weather_condition       TEXT    NOT NULL,
                 precipitation           INTEGER NOT NULL,
                 visibility_level        TEXT    NOT NULL,
                 road_id                 TEXT    NOT NULL,
                 start_node              TEXT    NOT NULL,
                 end_node                TEXT    NOT NULL,
                 num_lanes               INTEGER NOT NULL,
                 speed_limit             INTEGER NOT NULL,
                 distance_km             REAL    NOT NULL,
                 is_intersection         INTEGER NOT NULL,
                 neighborhood_id         TEXT    NOT NULL,
                 neighborhood_population INTEGER NOT NULL,
                 working_population_pct  REAL    NOT NULL,
                 students_population     INTEGER NOT NULL,
                 distance_to_school_m    INTEGER NOT NULL,
                 crosswalk_present       INTEGER NOT NULL,
                 crossing_guard_present  INTEGER NOT NULL,
                 traffic_volume          INTEGER NOT NULL,
                 average_speed           REAL    NOT NULL,
                 congestion_level        TEXT    NOT NULL,
                 accident_risk           TEXT    NOT NULL
             );",
        )?;

        log::debug!("sqlite output in {}", dir.join(DB_FILE).display());
        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_roads(&mut self, rows: &[RoadRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO roads \
                 (road_id, street_name, from_x, from_y, to_x, to_y, length_km, \
                  num_lanes, speed_limit, is_intersection) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.road_id,
                    row.street_name,
                    row.from_x,
                    row.from_y,
                    row.to_x,
                    row.to_y,
                    row.length_km,
                    row.num_lanes,
                    row.speed_limit,
                    row.is_intersection as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_neighborhoods(&mut self, rows: &[NeighborhoodRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO neighborhoods \
                 (neighborhood_id, display_name, neighborhood_population, \
                  working_population_pct, students_population, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.neighborhood_id,
                    row.display_name,
                    row.neighborhood_population,
                    row.working_population_pct,
                    row.students_population,
                    row.x,
                    row.y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_samples(&mut self, samples: &[TelemetrySample]) -> OutputResult<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO telemetry VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, \
                  ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
            )?;
            for s in samples {
                stmt.execute(params![
                    s.hour.get(),
                    s.day_of_week,
                    s.is_school_day as i64,
                    s.is_arrival_time as i64,
                    s.is_dismissal_time as i64,
                    s.weather_condition.as_str(),
                    s.precipitation as i64,
                    s.visibility_level.as_str(),
                    s.road_id.to_string(),
                    s.start_node.to_string(),
                    s.end_node.to_string(),
                    s.num_lanes,
                    s.speed_limit,
                    s.distance_km,
                    s.is_intersection as i64,
                    s.neighborhood_id.to_string(),
                    s.neighborhood_population,
                    s.working_population_pct,
                    s.students_population,
                    s.distance_to_school_m,
                    s.crosswalk_present as i64,
                    s.crossing_guard_present as i64,
                    s.traffic_volume,
                    s.average_speed,
                    s.congestion_level.as_str(),
                    s.accident_risk.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
