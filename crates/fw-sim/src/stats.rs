//! Run-wide tallies.

use std::fmt;

use fw_core::{Statistics, Tick};
use fw_road::Agent;

/// Accumulated results of a run.
///
/// Every agent that leaves the road is tallied once; when the run ends the
/// agents still on it are tallied as unfinished, so each accumulator ends
/// up with one sample per created agent (efficiency skips agents that never
/// saw a tick).
#[derive(Clone, Debug, Default)]
pub struct RunStats {
    pub distance:     Statistics,
    /// Ticks from creation to departure (or to the end of the run).
    pub elapsed:      Statistics,
    pub lane_changes: Statistics,
    pub accidents:    Statistics,
    pub breakdowns:   Statistics,
    /// Feet per tick.
    pub efficiency:   Statistics,
    pub entered:      u64,
    pub finished:     u64,
    /// Agents created per entry lane, indexed by `LaneId`.
    pub entries_by_lane: Vec<u64>,
    /// Agents created per intended exit lane, indexed by `LaneId`.
    pub exits_by_lane:   Vec<u64>,
}

impl RunStats {
    pub fn new(lanes: usize) -> Self {
        Self {
            entries_by_lane: vec![0; lanes],
            exits_by_lane: vec![0; lanes],
            ..Self::default()
        }
    }

    pub fn record_entry(&mut self, agent: &Agent) {
        self.entered += 1;
        if let Some(n) = self.entries_by_lane.get_mut(agent.lane.index()) {
            *n += 1;
        }
        if let Some(n) = self.exits_by_lane.get_mut(agent.exit_lane.index()) {
            *n += 1;
        }
    }

    /// Tally an agent leaving the road at `now`.  `finished` is false for
    /// agents still resident when the run ends.
    pub fn record_departure(&mut self, agent: &Agent, now: Tick, finished: bool) {
        if finished {
            self.finished += 1;
        }
        self.distance.add_sample(agent.distance as f64);
        self.elapsed.add_sample(now.since(agent.created) as f64);
        self.lane_changes.add_sample(f64::from(agent.lane_changes));
        self.accidents.add_sample(f64::from(agent.accidents));
        self.breakdowns.add_sample(f64::from(agent.breakdowns));
        if let Some(eff) = agent.efficiency(now) {
            self.efficiency.add_sample(eff);
        }
    }

    /// Agents created and not yet tallied as finished.
    pub fn in_flight(&self) -> u64 {
        self.entered.saturating_sub(self.finished)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "D={} T={} F={} E={} C={} A={} B={} EFF={}",
            self.distance,
            self.elapsed,
            self.finished,
            self.entered,
            self.lane_changes,
            self.accidents,
            self.breakdowns,
            self.efficiency,
        )
    }
}
