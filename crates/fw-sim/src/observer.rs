//! Simulation observer trait for progress reporting and data collection.

use fw_core::Tick;
use fw_road::{Agent, Roadway};

use crate::stats::RunStats;

/// Counts for one completed tick, passed to
/// [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Agents created by the feed this tick.
    pub created:      u32,
    /// Agents admitted from a queue onto their lane.
    pub admitted:     u32,
    /// Agents that left the simulation.
    pub absorbed:     u32,
    pub lane_changes: u32,
    pub feeds:        u32,
    pub accidents:    u32,
    pub breakdowns:   u32,
    /// Agents on the road after the tick, queued ones included.
    pub resident:     u32,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — departure counter
///
/// ```rust
/// use fw_core::Tick;
/// use fw_road::Agent;
/// use fw_sim::SimObserver;
///
/// struct Departures(u64);
///
/// impl SimObserver for Departures {
///     fn on_agent_removed(&mut self, _tick: Tick, _agent: &Agent) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, before admissions.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at report intervals (every `config.report_interval_ticks`
    /// ticks) with read-only access to the whole road.
    fn on_snapshot(&mut self, _tick: Tick, _roadway: &Roadway) {}

    /// Called for every agent absorbed at the end of its route, after it
    /// has been tallied.
    fn on_agent_removed(&mut self, _tick: Tick, _agent: &Agent) {}

    /// Called once after the final tick, with unfinished agents tallied.
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &RunStats) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
