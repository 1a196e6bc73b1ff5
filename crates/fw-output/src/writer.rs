//! The `OutputWriter` trait implemented by backend writers.

use crate::{LaneSnapshotRow, OutputResult, TickSummaryRow};

/// Trait implemented by output backends.
///
/// The observer never panics on a failed write; errors are stored and
/// retrieved with [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one row per lane for a report tick.
    fn write_lane_snapshots(&mut self, rows: &[LaneSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
