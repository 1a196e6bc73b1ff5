//! Integration tests for fw-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, SNAPSHOT_HEADER, SUMMARY_HEADER};
    use crate::row::{LaneSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(lane_id: u32, tick: u64) -> LaneSnapshotRow {
        LaneSnapshotRow { tick, lane_id, waiting: lane_id, moving: lane_id * 10 }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            created:      2,
            admitted:     1,
            absorbed:     0,
            lane_changes: 4,
            feeds:        1,
            accidents:    0,
            breakdowns:   0,
            resident:     17,
        }
    }

    fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("tick_summaries.csv").exists());
        assert!(dir.path().join("lane_snapshots.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SUMMARY_HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("lane_snapshots.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, SNAPSHOT_HEADER);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_lane_snapshots(&[snap_row(0, 60), snap_row(1, 60), snap_row(2, 60)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("lane_snapshots.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "60"); // tick
        assert_eq!(&rows[1][1], "1");  // lane_id
        assert_eq!(&rows[2][2], "2");  // waiting
        assert_eq!(&rows[2][3], "20"); // moving
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        let fields: Vec<&str> = rows[0].iter().collect();
        assert_eq!(fields, ["3", "2", "1", "0", "4", "1", "0", "0", "17"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_is_io_error() {
        let dir = tmp();
        let missing = dir.path().join("nope");
        assert!(CsvWriter::new(&missing).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use fw_core::{SimConfig, Velocity};
    use fw_driver::DriverParams;
    use fw_road::{LaneParams, RoadwayBuilder};
    use fw_sim::{FeedSchedule, FeedSegment, SimBuilder};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::error::OutputResult;
    use crate::observer::SimOutputObserver;
    use crate::row::{LaneSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::OutputError;

    fn one_lane() -> RoadwayBuilder {
        let mut b = RoadwayBuilder::new();
        b.add_lane(LaneParams::absorbing("main", 1_000, Velocity::from_fps(60.0)).generate(1.0))
            .unwrap();
        b.add_driver(DriverParams::named("d")).unwrap();
        b
    }

    /// Fails every summary write after the first `ok` ones.
    struct Flaky {
        ok:       usize,
        written:  usize,
        finished: bool,
    }

    impl OutputWriter for Flaky {
        fn write_lane_snapshots(&mut self, _rows: &[LaneSnapshotRow]) -> OutputResult<()> {
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.written += 1;
            if self.written > self.ok {
                return Err(OutputError::Io(std::io::Error::other(format!("tick {}", row.tick))));
            }
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn integration_csv() {
        // One agent at tick 1, absorbed at tick 24; 41 ticks in all.
        let config = SimConfig { seed: 42, report_interval_ticks: 10, ..SimConfig::default() };
        let schedule = FeedSchedule::new(vec![FeedSegment::new(1.0, 1), FeedSegment::new(0.0, 40)]).unwrap();
        let mut sim = SimBuilder::new(config, one_lane()).schedule(schedule).build().unwrap();

        let dir: TempDir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 41);
        assert_eq!(&rows[0][0], "1");  // tick
        assert_eq!(&rows[0][1], "1");  // created
        assert_eq!(&rows[23][3], "1"); // absorbed at tick 24
        assert_eq!(&rows[23][8], "0"); // resident

        // Report interval 10 → snapshots at ticks 10, 20, 30, 40, one lane each.
        let mut rdr = csv::Reader::from_path(dir.path().join("lane_snapshots.csv")).unwrap();
        let snaps: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        let ticks: Vec<&str> = snaps.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(ticks, ["10", "20", "30", "40"]);
        assert_eq!((&snaps[0][2], &snaps[0][3]), ("0", "1"));
        assert_eq!((&snaps[2][2], &snaps[2][3]), ("0", "0"));
    }

    #[test]
    fn first_error_is_kept_and_run_continues() {
        let config = SimConfig { seed: 1, report_interval_ticks: 0, ..SimConfig::default() };
        let mut sim = SimBuilder::new(config, one_lane())
            .schedule(FeedSchedule::constant(0.0, 5).unwrap())
            .build()
            .unwrap();

        let mut obs = SimOutputObserver::new(Flaky { ok: 2, written: 0, finished: false });
        sim.run(&mut obs).unwrap();

        let err = obs.take_error().expect("write error stored");
        assert_eq!(err.to_string(), "I/O error: tick 3");
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.written, 5);
        assert!(writer.finished);
    }
}
