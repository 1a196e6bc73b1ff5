//! Per-agent operations: velocity choice, movement, queue admission, and
//! lane transfers.
//!
//! Every operation takes the [`TickContext`] so random draws happen in call
//! order.  The tick driver in [`tick`](crate::tick) invokes them phase by
//! phase.

use fw_core::{AgentId, LaneId, Velocity};
use fw_driver::FollowView;
use tracing::{debug, trace};

use crate::body::Body;
use crate::context::TickContext;
use crate::error::RoadResult;
use crate::lane::Outflow;
use crate::roadway::Roadway;

/// Result of [`Roadway::move_agent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Under repair; nothing happened.
    Held,
    /// Advanced this many feet (possibly 0).
    Moved(i64),
    BrokeDown,
    /// Clamped behind the leader and crashed.
    Crashed,
}

impl Roadway {
    /// Pick the velocity an agent will move at this tick.
    ///
    /// Queued agents and agents still under repair keep their current
    /// `next_velocity`.  The choice never carries the agent past its lane's
    /// force point for its exit, and is 0 once the rear bumper has left
    /// the lane.
    pub fn choose_velocity(&mut self, id: AgentId, ctx: &mut TickContext<'_>) -> RoadResult<()> {
        let body = self.body_of(id)?;
        if body.in_queue() {
            return Ok(());
        }
        if !self.agent_mut(id)?.check_repaired(ctx.now) {
            return Ok(());
        }

        let agent = self.agent_ref(id)?;
        let profile = self.profile(agent.driver)?;
        let view = FollowView {
            max_velocity: profile.step_toward(agent.last_velocity, agent.cruise),
            leader:       self.leader_of(agent.lane, agent.slot, body.front),
        };
        let mut next = profile.velocity(&view, ctx.rng.inner());

        if let Some(rule) = agent.exit {
            if rule.force <= body.front + next.fps_i() {
                next = Velocity::from_fps((rule.force - body.front).max(0) as f64);
            }
        }
        if self.lanes[agent.lane.index()].length < body.rear {
            next = Velocity::ZERO;
        }

        self.agent_mut(id)?.next_velocity = next;
        Ok(())
    }

    /// Advance an agent by its chosen velocity.
    ///
    /// Rolls for a breakdown first.  A move that would reach the leader is
    /// clamped one foot short; if the realized share of the intended move
    /// drops below `accident_ratio` the agent rolls for an accident and, on
    /// a hit, stops where it was clamped without being credited distance.
    pub fn move_agent(&mut self, id: AgentId, ctx: &mut TickContext<'_>) -> RoadResult<MoveOutcome> {
        let agent = self.agent_ref(id)?;
        if agent.repair_until.is_some() {
            return Ok(MoveOutcome::Held);
        }
        let profile = self.profile(agent.driver)?;
        let (breakdown, accident) = (profile.breakdown(), profile.accident());
        let (lane, slot, intended) = (agent.lane, agent.slot, agent.next_velocity);
        let repaired_at = ctx.now + self.tuning.repair_ticks;

        if ctx.rng.chance(breakdown) {
            let agent = self.agent_mut(id)?;
            agent.disable(repaired_at);
            agent.breakdowns += 1;
            debug!(agent = %id, lane = %lane, tick = %ctx.now, "breakdown");
            return Ok(MoveOutcome::BrokeDown);
        }

        let residents = &self.lanes[lane.index()].residents;
        let body = self.body_of(id)?;
        let ahead = residents.prev(slot).and_then(|s| residents.get(s)).copied();

        let mut front = body.front + intended.fps_i();
        if let Some(ahead) = ahead {
            if front >= ahead.rear {
                front = ahead.rear - 1;
                let ratio = (front - body.front) as f64 / intended.fps();
                if ratio < self.tuning.accident_ratio && ctx.rng.chance(accident) {
                    self.lanes[lane.index()].residents.reposition(slot, body.at(front))?;
                    let agent = self.agent_mut(id)?;
                    agent.disable(repaired_at);
                    agent.accidents += 1;
                    debug!(agent = %id, lane = %lane, front, tick = %ctx.now, "accident");
                    return Ok(MoveOutcome::Crashed);
                }
            }
        }

        let moved = front - body.front;
        self.lanes[lane.index()].residents.reposition(slot, body.at(front))?;
        let agent = self.agent_mut(id)?;
        agent.next_velocity = Velocity::ZERO;
        agent.last_velocity = Velocity::from_fps(moved as f64);
        agent.distance += moved;
        Ok(MoveOutcome::Moved(moved))
    }

    /// Admit a queued agent onto the lane proper.
    ///
    /// Refused while the agent ahead still has its rear bumper in the queue
    /// or while the lane's meter is closed.  On admission the front bumper
    /// is placed at 0, the meter restarts, and a velocity is chosen from
    /// the new position.
    pub fn move_in_queue(&mut self, id: AgentId, ctx: &mut TickContext<'_>) -> RoadResult<bool> {
        let agent = self.agent_ref(id)?;
        let (lane_id, slot) = (agent.lane, agent.slot);
        let lane = &self.lanes[lane_id.index()];

        let ahead = lane.residents.prev(slot).and_then(|s| lane.residents.get(s));
        if ahead.is_some_and(Body::tail_in_queue) || !lane.meter_open(ctx.now) {
            return Ok(false);
        }

        let entered = self.body_of(id)?.at(0);
        let profile = self.profile(agent.driver)?;
        let view = FollowView {
            max_velocity: profile.step_toward(agent.last_velocity, agent.cruise),
            leader:       self.leader_of(lane_id, slot, 0),
        };
        let next = profile.velocity(&view, ctx.rng.inner());

        let lane = &mut self.lanes[lane_id.index()];
        lane.residents.reposition(slot, entered)?;
        lane.restart_meter(ctx.now);
        self.agent_mut(id)?.next_velocity = next;
        trace!(agent = %id, lane = %lane_id, tick = %ctx.now, "left queue");
        Ok(true)
    }

    /// The lane an agent would like to move into this tick, if any.
    ///
    /// Past its exit rule's encourage point the agent asks for the rule's
    /// target without drawing.  Otherwise it considers the neighbors at its
    /// front bumper that still reach its exit and accept its passenger
    /// count; one draw decides whether to change at all (boosted when its
    /// own lane is much busier than a candidate) and a second picks the
    /// candidate.
    pub fn want_lane_change(&self, id: AgentId, ctx: &mut TickContext<'_>) -> RoadResult<Option<LaneId>> {
        let agent = self.agent_ref(id)?;
        let body = self.body_of(id)?;
        if body.in_queue() {
            return Ok(None);
        }

        if let Some(rule) = agent.exit {
            if rule.encourage <= body.front {
                if agent.lane == agent.exit_lane || rule.change_to == agent.lane {
                    return Ok(None);
                }
                return Ok(Some(rule.change_to));
            }
        }

        let lane = &self.lanes[agent.lane.index()];
        let mut bias = 1.0;
        let mut candidates = Vec::new();
        for &target in lane.neighbors_at(body.front) {
            let other = &self.lanes[target.index()];
            if !other.reaches(agent.exit_lane) || other.min_passengers > agent.passengers {
                continue;
            }
            if lane.len() > other.len() + self.tuning.congestion_margin {
                bias = self.tuning.congestion_bias;
            }
            candidates.push(target);
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        let p = self.profile(agent.driver)?.lane_change() * bias;
        if !ctx.rng.chance(p) {
            return Ok(None);
        }
        Ok(Some(candidates[ctx.rng.pick_index(candidates.len())]))
    }

    /// Move an agent sideways into `target`.
    ///
    /// Fails without side effects when the lanes are not adjacent at the
    /// agent's front bumper, the mapped position is not positive, or the
    /// gap in the target lane is too small.
    pub fn lane_change(&mut self, id: AgentId, target: LaneId, ctx: &mut TickContext<'_>) -> RoadResult<bool> {
        let agent = self.agent_ref(id)?;
        let Some(adjacency) = self.lanes[agent.lane.index()].adjacency(target).copied() else {
            return Ok(false);
        };
        let body = self.body_of(id)?;
        let Some(front) = adjacency.convert(body.front).filter(|&f| f > 0) else {
            return Ok(false);
        };
        self.transfer(id, target, front, ctx)
    }

    /// Hand an agent past the end of a feeding lane to its successor.
    pub fn lane_feed(&mut self, id: AgentId, ctx: &mut TickContext<'_>) -> RoadResult<bool> {
        let agent = self.agent_ref(id)?;
        let lane = &self.lanes[agent.lane.index()];
        let Outflow::Feed { into, offset } = lane.outflow else {
            return Ok(false);
        };
        let front = self.body_of(id)?.front + offset - lane.length;
        self.transfer(id, into, front, ctx)
    }

    /// Reinsert an agent into `dst` with its front bumper at `front`.
    ///
    /// Leaves the agent where it was if the margins around the new spot are
    /// too small or the spot is occupied.  On success the agent's cruise
    /// speed and exit rule follow the new lane and a fresh velocity is
    /// chosen.
    fn transfer(&mut self, id: AgentId, dst: LaneId, front: i64, ctx: &mut TickContext<'_>) -> RoadResult<bool> {
        let agent = self.agent_ref(id)?;
        let (src, slot, last, exit_lane) = (agent.lane, agent.slot, agent.last_velocity, agent.exit_lane);
        let profile = self.profile(agent.driver)?;
        let (lead, trail) = (profile.change_lead(), profile.change_trail());
        let cruise = profile.cruise(self.lanes[dst.index()].speed_limit);
        let exit = self.lanes[dst.index()].exit_rule(exit_lane);

        let old = self.body_of(id)?;
        let moved = old.at(front);
        self.lanes[src.index()].residents.remove(slot);

        let placed = if self.clears_margins(dst, &moved, last, lead, trail) {
            self.lanes[dst.index()].residents.insert_if_possible(moved)
        } else {
            None
        };

        let Some(new_slot) = placed else {
            let back = self.lanes[src.index()].residents.insert(old)?;
            self.agent_mut(id)?.slot = back;
            trace!(agent = %id, from = %src, to = %dst, "transfer refused");
            return Ok(false);
        };

        let agent = self.agent_mut(id)?;
        agent.lane = dst;
        agent.slot = new_slot;
        agent.cruise = cruise;
        agent.exit = exit;
        agent.lane_changes += 1;
        trace!(agent = %id, from = %src, to = %dst, front, tick = %ctx.now, "transfer");

        self.choose_velocity(id, ctx)?;
        Ok(true)
    }

    /// The leader in `dst` keeps `own_last × lead` feet ahead of `body` and
    /// the follower keeps its own last velocity `× trail` feet behind.
    fn clears_margins(&self, dst: LaneId, body: &Body, own_last: Velocity, lead: f64, trail: f64) -> bool {
        let residents = &self.lanes[dst.index()].residents;
        let ahead = residents.find_at_or_before(body);

        if let Some(leader) = ahead.and_then(|s| residents.get(s)) {
            if ((leader.rear - body.front) as f64) < own_last.fps() * lead {
                return false;
            }
        }

        let behind = match ahead {
            Some(s) => residents.next(s),
            None => residents.head(),
        };
        if let Some(follower) = behind.and_then(|s| residents.get(s)) {
            let follower_last = self
                .agents
                .get(&follower.agent)
                .map_or(Velocity::ZERO, |a| a.last_velocity);
            if ((body.rear - follower.front) as f64) < follower_last.fps() * trail {
                return false;
            }
        }
        true
    }
}
