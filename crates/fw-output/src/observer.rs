//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use fw_core::Tick;
use fw_road::Roadway;
use fw_sim::{RunStats, SimObserver, TickSummary};

use crate::row::{LaneSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries and lane snapshots to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        let row = TickSummaryRow {
            tick:         tick.0,
            created:      summary.created,
            admitted:     summary.admitted,
            absorbed:     summary.absorbed,
            lane_changes: summary.lane_changes,
            feeds:        summary.feeds,
            accidents:    summary.accidents,
            breakdowns:   summary.breakdowns,
            resident:     summary.resident,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, roadway: &Roadway) {
        let rows: Vec<LaneSnapshotRow> = roadway
            .lanes()
            .iter()
            .map(|lane| LaneSnapshotRow {
                tick:    tick.0,
                lane_id: lane.id.0,
                waiting: lane.waiting() as u32,
                moving:  lane.moving() as u32,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_lane_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &RunStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
