//! The four-phase tick protocol.
//!
//! | Phase  | Per lane, head to tail                                        |
//! |--------|---------------------------------------------------------------|
//! | Choose | [`choose_velocity`](Roadway::choose_velocity)                 |
//! | Change | collect every [`want_lane_change`](Roadway::want_lane_change) network-wide, then apply |
//! | Move   | [`move_in_queue`](Roadway::move_in_queue) or [`move_agent`](Roadway::move_agent); the first refused admission ends the lane |
//! | Remove | heads past the end are fed to the successor or absorbed      |
//!
//! Lanes are visited in registration order in every phase.

use fw_core::AgentId;
use tracing::trace;

use crate::agent::Agent;
use crate::context::TickContext;
use crate::error::RoadResult;
use crate::lane::Outflow;
use crate::motion::MoveOutcome;
use crate::roadway::Roadway;

/// What happened on the road during one [`step`](Roadway::step).
#[derive(Debug, Default)]
pub struct StepReport {
    /// Agents that left the simulation, in removal order.
    pub absorbed:     Vec<Agent>,
    /// Agents admitted from a queue onto the lane proper.
    pub admitted:     u32,
    /// Successful sideways lane changes.
    pub lane_changes: u32,
    /// Successful end-of-lane transfers.
    pub feeds:        u32,
    pub accidents:    u32,
    pub breakdowns:   u32,
}

impl Roadway {
    /// Run one tick over every lane.
    pub fn step(&mut self, ctx: &mut TickContext<'_>) -> RoadResult<StepReport> {
        let mut report = StepReport::default();

        // Choose
        for lane in 0..self.lanes.len() {
            self.walk(lane, |road, id| {
                road.choose_velocity(id, ctx)?;
                Ok(true)
            })?;
        }

        // Change
        let mut wanted = Vec::new();
        for lane in &self.lanes {
            for (_, body) in lane.residents.iter() {
                if let Some(target) = self.want_lane_change(body.agent, ctx)? {
                    wanted.push((body.agent, target));
                }
            }
        }
        for (id, target) in wanted {
            if self.lane_change(id, target, ctx)? {
                report.lane_changes += 1;
            }
        }

        // Move
        for lane in 0..self.lanes.len() {
            self.walk(lane, |road, id| {
                if road.body_of(id)?.in_queue() {
                    let admitted = road.move_in_queue(id, ctx)?;
                    report.admitted += u32::from(admitted);
                    return Ok(admitted);
                }
                match road.move_agent(id, ctx)? {
                    MoveOutcome::BrokeDown => report.breakdowns += 1,
                    MoveOutcome::Crashed => report.accidents += 1,
                    MoveOutcome::Held | MoveOutcome::Moved(_) => {}
                }
                Ok(true)
            })?;
        }

        // Remove
        for lane in 0..self.lanes.len() {
            loop {
                let l = &self.lanes[lane];
                let Some(head) = l.residents.head().and_then(|s| l.residents.get(s)).copied() else {
                    break;
                };
                if head.front < l.length {
                    break;
                }
                let outflow = l.outflow;
                match outflow {
                    Outflow::Feed { .. } => {
                        if !self.lane_feed(head.agent, ctx)? {
                            break;
                        }
                        report.feeds += 1;
                    }
                    Outflow::Absorb { .. } => {
                        let agent = self.absorb(head.agent)?;
                        trace!(agent = %agent.id, lane = %agent.lane, tick = %ctx.now, "absorbed");
                        report.absorbed.push(agent);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Visit a lane's residents head to tail until `f` returns `false`.
    ///
    /// `f` may change agents' positions but must not add or remove
    /// residents of `lane`.
    fn walk<F>(&mut self, lane: usize, mut f: F) -> RoadResult<()>
    where
        F: FnMut(&mut Self, AgentId) -> RoadResult<bool>,
    {
        let mut cursor = self.lanes[lane].residents.head();
        while let Some(slot) = cursor {
            let Some(id) = self.lanes[lane].residents.get(slot).map(|b| b.agent) else {
                break;
            };
            if !f(self, id)? {
                break;
            }
            cursor = self.lanes[lane].residents.next(slot);
        }
        Ok(())
    }
}
