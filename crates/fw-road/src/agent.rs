//! Per-vehicle state.

use fw_core::{AgentId, DriverId, LaneId, Tick, Velocity};
use fw_index::SlotId;

use crate::body::Body;
use crate::lane::ExitRule;

/// Coarse state derived from position and repair status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    /// Waiting in the lane's entry queue (front bumper below 0).
    Queued,
    Moving,
    /// Immobile after an accident or breakdown.
    RepairWait,
}

/// Everything needed to create an agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentRequest {
    /// Feet.
    pub length:     i64,
    pub driver:     DriverId,
    pub passengers: u32,
    /// `(entry, exit)`.  `None` draws both from the roadway's generation
    /// and absorption distributions.
    pub route:      Option<(LaneId, LaneId)>,
}

/// A vehicle resident on the roadway.
///
/// The agent's position lives in its lane's index (see
/// [`Roadway::body`](crate::Roadway::body)); `slot` is the handle into it.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id:            AgentId,
    pub length:        i64,
    pub driver:        DriverId,
    pub passengers:    u32,
    pub lane:          LaneId,
    pub exit_lane:     LaneId,
    pub created:       Tick,
    /// Feet covered on the lane proper.
    pub distance:      i64,
    pub last_velocity: Velocity,
    pub next_velocity: Velocity,
    pub lane_changes:  u32,
    pub accidents:     u32,
    pub breakdowns:    u32,
    /// Immobile until this tick while set.
    pub repair_until:  Option<Tick>,
    pub(crate) slot:   SlotId,
    /// Current lane's speed limit plus the driver's offset.
    pub(crate) cruise: Velocity,
    /// Current lane's rule for reaching `exit_lane`, if it has one.
    pub(crate) exit:   Option<ExitRule>,
}

impl Agent {
    pub fn cruise(&self) -> Velocity {
        self.cruise
    }

    pub fn exit_rule(&self) -> Option<ExitRule> {
        self.exit
    }

    pub fn status(&self, body: &Body) -> AgentStatus {
        if body.in_queue() {
            AgentStatus::Queued
        } else if self.repair_until.is_some() {
            AgentStatus::RepairWait
        } else {
            AgentStatus::Moving
        }
    }

    /// Clear the repair once `now` reaches it.  Returns whether the agent
    /// may move.
    pub(crate) fn check_repaired(&mut self, now: Tick) -> bool {
        match self.repair_until {
            Some(t) if now < t => false,
            Some(_) => {
                self.repair_until = None;
                true
            }
            None => true,
        }
    }

    /// Zero both velocities and start a repair ending at `until`.
    pub(crate) fn disable(&mut self, until: Tick) {
        self.last_velocity = Velocity::ZERO;
        self.next_velocity = Velocity::ZERO;
        self.repair_until = Some(until);
    }

    /// Feet per tick, for efficiency accounting.
    pub fn efficiency(&self, now: Tick) -> Option<f64> {
        let elapsed = now.since(self.created);
        (elapsed > 0).then(|| self.distance as f64 / elapsed as f64)
    }
}
