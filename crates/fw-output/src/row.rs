//! Plain data row types written by output backends.

/// Counts for one simulated tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub created:      u32,
    pub admitted:     u32,
    pub absorbed:     u32,
    pub lane_changes: u32,
    pub feeds:        u32,
    pub accidents:    u32,
    pub breakdowns:   u32,
    pub resident:     u32,
}

/// Occupancy of one lane at a report tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSnapshotRow {
    pub tick:    u64,
    pub lane_id: u32,
    /// Agents still in the entry queue (rear behind position 0).
    pub waiting: u32,
    pub moving:  u32,
}
