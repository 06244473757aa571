//! Unit tests for sf-output.

#[cfg(test)]
mod helpers {
    use sf_core::CityConfig;
    use sf_grid::{Topology, TopologyBuilder};

    pub fn small_config() -> CityConfig {
        let mut config = CityConfig::default();
        config.telemetry.days = 1;
        config.telemetry.windows_per_day = 2;
        config.telemetry.samples_per_segment = 1;
        config
    }

    pub fn topology(config: &CityConfig) -> Topology {
        TopologyBuilder::new(config).build().unwrap()
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use sf_core::{GridPos, RoadId};
    use sf_grid::RoadSegment;

    use crate::RoadRow;

    #[test]
    fn road_row_leaves_missing_optionals_empty() {
        let seg = RoadSegment {
            id:              RoadId(7),
            street_name:     "Elm Ave".into(),
            from:            GridPos::new(1, 2),
            to:              GridPos::new(1, 3),
            length_km:       0.1,
            lanes:           Some(2),
            speed_limit:     None,
            is_intersection: true,
        };
        let rec = RoadRow::from(&seg).to_record();
        assert_eq!(rec[0], "7");
        assert_eq!(rec[1], "Elm Ave");
        assert_eq!(rec[7], "2");
        assert_eq!(rec[8], "");
        assert_eq!(rec[9], "1");
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use sf_grid::{load_neighborhoods_csv, load_roads_csv};
    use sf_telemetry::{COLUMNS, CorpusGenerator};

    use super::helpers::{small_config, topology};
    use crate::csv::{NEIGHBORHOODS_FILE, ROADS_FILE, TELEMETRY_FILE};
    use crate::{CorpusOutputObserver, CsvWriter, OutputWriter};

    #[test]
    fn creates_files_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        for file in [ROADS_FILE, NEIGHBORHOODS_FILE, TELEMETRY_FILE] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
        let telemetry = std::fs::read_to_string(dir.path().join(TELEMETRY_FILE)).unwrap();
        assert_eq!(telemetry.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn topology_reloads_through_loader() {
        let config = small_config();
        let topo = topology(&config);
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_topology(&topo).unwrap();
        w.finish().unwrap();

        let roads = load_roads_csv(&dir.path().join(ROADS_FILE), config.segment_length_km).unwrap();
        assert_eq!(roads.len(), topo.roads.len());
        for (a, b) in roads.iter().zip(&topo.roads) {
            assert_eq!(a.id, b.id);
            assert_eq!((a.from, a.to), (b.from, b.to));
            assert_eq!(a.street_name, b.street_name);
            assert_eq!(a.lanes, b.lanes);
            assert_eq!(a.speed_limit, b.speed_limit);
        }

        let hoods = load_neighborhoods_csv(&dir.path().join(NEIGHBORHOODS_FILE)).unwrap();
        assert_eq!(hoods, topo.neighborhoods);
    }

    #[test]
    fn rerun_truncates_corpus() {
        let config = small_config();
        let topo = topology(&config);
        let dir = tempfile::tempdir().unwrap();

        let generate = || {
            let mut obs = CorpusOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
            let stats = CorpusGenerator::new(&config, &topo).unwrap().run(&mut obs);
            assert!(obs.take_error().is_none());
            stats.samples
        };
        generate();
        let expected = generate();

        let mut reader = csv::Reader::from_path(dir.path().join(TELEMETRY_FILE)).unwrap();
        assert_eq!(reader.records().count(), expected);
    }

    #[test]
    fn observer_streams_whole_corpus() {
        let config = small_config();
        let topo = topology(&config);
        let generator = CorpusGenerator::new(&config, &topo).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut obs = CorpusOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let stats = generator.run(&mut obs);
        assert!(obs.take_error().is_none());
        assert_eq!(obs.written(), stats.samples);
        assert_eq!(stats.samples, generator.expected_samples());

        let mut reader = csv::Reader::from_path(dir.path().join(TELEMETRY_FILE)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), stats.samples);

        let congestion = headers.iter().position(|h| h == "congestion_level").unwrap();
        for row in &rows {
            assert!(matches!(&row[congestion], "LOW" | "MEDIUM" | "HIGH"));
        }
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;
    use sf_telemetry::CorpusGenerator;

    use super::helpers::{small_config, topology};
    use crate::sqlite::DB_FILE;
    use crate::{CorpusOutputObserver, OutputWriter, SqliteWriter};

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn creates_db_with_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join(DB_FILE)).unwrap();
        for table in ["roads", "neighborhoods", "telemetry"] {
            assert_eq!(count(&conn, table), 0, "{table} should be empty");
        }
    }

    #[test]
    fn writes_topology_and_corpus() {
        let config = small_config();
        let topo = topology(&config);
        let dir = tempfile::tempdir().unwrap();

        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_topology(&topo).unwrap();
        let mut obs = CorpusOutputObserver::new(w);
        let stats = CorpusGenerator::new(&config, &topo).unwrap().run(&mut obs);
        assert!(obs.take_error().is_none());

        let conn = Connection::open(dir.path().join(DB_FILE)).unwrap();
        assert_eq!(count(&conn, "roads") as usize, topo.roads.len());
        assert_eq!(count(&conn, "neighborhoods") as usize, topo.neighborhoods.len());
        assert_eq!(count(&conn, "telemetry") as usize, stats.samples);

        let bad: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM telemetry WHERE average_speed < 5.0 OR hour > 23",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(bad, 0);
    }

    #[test]
    fn rerun_replaces_previous_output() {
        let config = small_config();
        let topo = topology(&config);
        let dir = tempfile::tempdir().unwrap();

        let generate = || {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            w.write_topology(&topo).unwrap();
            let mut obs = CorpusOutputObserver::new(w);
            let stats = CorpusGenerator::new(&config, &topo).unwrap().run(&mut obs);
            assert!(obs.take_error().is_none());
            stats.samples
        };
        generate();
        let expected = generate();

        let conn = Connection::open(dir.path().join(DB_FILE)).unwrap();
        assert_eq!(count(&conn, "telemetry") as usize, expected);
        assert_eq!(count(&conn, "roads") as usize, topo.roads.len());
        assert_eq!(count(&conn, "neighborhoods") as usize, topo.neighborhoods.len());
    }
}
