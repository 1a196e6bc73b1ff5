//! The lane network and its resident agents.

use fw_core::{AgentId, DriverId, LaneId, Tuning, Velocity, WeightedSampler};
use fw_driver::{DriverProfile, DriverRegistry, Leader};
use fw_index::SlotId;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::agent::{Agent, AgentRequest, AgentStatus};
use crate::body::Body;
use crate::context::TickContext;
use crate::error::{RoadError, RoadResult};
use crate::lane::Lane;

/// Route draws attempted before giving up on finding a reachable
/// entry/exit pair.
const MAX_ROUTE_DRAWS: usize = 10_000;

/// Lanes, drivers, and every agent currently on the road.
///
/// Built by [`RoadwayBuilder`](crate::RoadwayBuilder).  Agent positions live
/// in the lanes' position indexes; the agent map holds everything else.
pub struct Roadway {
    pub(crate) lanes:    Vec<Lane>,
    lane_names:          FxHashMap<String, LaneId>,
    drivers:             DriverRegistry,
    pub(crate) agents:   FxHashMap<AgentId, Agent>,
    next_agent:          u32,
    generate:            Option<WeightedSampler<LaneId>>,
    absorb:              Option<WeightedSampler<LaneId>>,
    pub(crate) tuning:   Tuning,
}

impl Roadway {
    pub(crate) fn new(
        lanes:      Vec<Lane>,
        lane_names: FxHashMap<String, LaneId>,
        drivers:    DriverRegistry,
        generate:   Option<WeightedSampler<LaneId>>,
        absorb:     Option<WeightedSampler<LaneId>>,
        tuning:     Tuning,
    ) -> Self {
        Self {
            lanes,
            lane_names,
            drivers,
            agents: FxHashMap::default(),
            next_agent: 0,
            generate,
            absorb,
            tuning,
        }
    }

    // ── Lanes ─────────────────────────────────────────────────────────────

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.index())
    }

    /// Lanes in registration order.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_id(&self, name: &str) -> Option<LaneId> {
        self.lane_names.get(name).copied()
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Entry-lane distribution, `None` when no lane generates traffic.
    pub fn entry_distribution(&self) -> Option<&WeightedSampler<LaneId>> {
        self.generate.as_ref()
    }

    /// Exit-lane distribution, `None` when no lane absorbs traffic.
    pub fn exit_distribution(&self) -> Option<&WeightedSampler<LaneId>> {
        self.absorb.as_ref()
    }

    // ── Agents ────────────────────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Number of agents on the road, queued ones included.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Current extent of a resident agent.
    pub fn body(&self, id: AgentId) -> Option<Body> {
        let agent = self.agents.get(&id)?;
        self.lanes.get(agent.lane.index())?.residents.get(agent.slot).copied()
    }

    pub fn status(&self, id: AgentId) -> Option<AgentStatus> {
        let agent = self.agents.get(&id)?;
        Some(agent.status(&self.body(id)?))
    }

    /// Every resident agent, lane by lane, head first.
    pub fn residents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.lanes
            .iter()
            .flat_map(|lane| lane.residents.iter())
            .filter_map(|(_, body)| self.agents.get(&body.agent))
    }

    /// Create an agent at the back of its entry lane.
    ///
    /// Without an explicit route, entry and exit are drawn from the
    /// generation and absorption distributions until the pair is
    /// reachable.  The agent starts one foot behind the tail when the tail
    /// still blocks the queue, at -1 otherwise, so it is always queued.
    pub fn create_agent(&mut self, req: AgentRequest, ctx: &mut TickContext<'_>) -> RoadResult<AgentId> {
        if req.length < self.tuning.min_agent_length {
            return Err(RoadError::AgentTooShort { length: req.length, min: self.tuning.min_agent_length });
        }
        let profile = self.profile(req.driver)?;

        let (entry, exit) = match req.route {
            Some((entry, exit)) => {
                let lane = self.lanes.get(entry.index()).ok_or(RoadError::UnknownLaneId(entry))?;
                if exit.index() >= self.lanes.len() {
                    return Err(RoadError::UnknownLaneId(exit));
                }
                if !lane.reaches(exit) {
                    return Err(RoadError::Unroutable { entry, exit });
                }
                (entry, exit)
            }
            None => self.draw_route(ctx)?,
        };
        let cruise = profile.cruise(self.lanes[entry.index()].speed_limit);

        let id = AgentId(self.next_agent);
        let lane = &mut self.lanes[entry.index()];
        let front = match lane.residents.tail().and_then(|s| lane.residents.get(s)) {
            Some(tail) if tail.tail_in_queue() => tail.rear - 1,
            _ => -1,
        };
        let slot = lane.residents.insert(Body::new(id, front, req.length))?;
        self.next_agent += 1;

        let agent = Agent {
            id,
            length:        req.length,
            driver:        req.driver,
            passengers:    req.passengers,
            lane:          entry,
            exit_lane:     exit,
            created:       ctx.now,
            distance:      0,
            last_velocity: lane.initial_velocity,
            next_velocity: Velocity::ZERO,
            lane_changes:  0,
            accidents:     0,
            breakdowns:    0,
            repair_until:  None,
            slot,
            cruise,
            exit:          lane.exit_rule(exit),
        };
        debug!(agent = %id, entry = %entry, exit = %exit, front, tick = %ctx.now, "agent created");
        self.agents.insert(id, agent);
        Ok(id)
    }

    fn draw_route(&self, ctx: &mut TickContext<'_>) -> RoadResult<(LaneId, LaneId)> {
        let generate = self.generate.as_ref().ok_or(RoadError::NoEntryLanes)?;
        let absorb = self.absorb.as_ref().ok_or(RoadError::NoExitLanes)?;
        for _ in 0..MAX_ROUTE_DRAWS {
            let entry = *generate.choose_fast(ctx.rng.inner());
            let exit = *absorb.choose_fast(ctx.rng.inner());
            if self.lanes[entry.index()].reaches(exit) {
                return Ok((entry, exit));
            }
        }
        Err(RoadError::NoRoute)
    }

    /// Take an agent off the road entirely.
    pub(crate) fn absorb(&mut self, id: AgentId) -> RoadResult<Agent> {
        let agent = self.agents.remove(&id).ok_or(RoadError::UnknownAgent(id))?;
        self.lanes[agent.lane.index()].residents.remove(agent.slot);
        Ok(agent)
    }

    // ── Internal lookups ──────────────────────────────────────────────────

    pub(crate) fn profile(&self, driver: DriverId) -> RoadResult<&DriverProfile> {
        self.drivers.get(driver).ok_or(RoadError::UnknownDriver(driver))
    }

    pub(crate) fn agent_ref(&self, id: AgentId) -> RoadResult<&Agent> {
        self.agents.get(&id).ok_or(RoadError::UnknownAgent(id))
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> RoadResult<&mut Agent> {
        self.agents.get_mut(&id).ok_or(RoadError::UnknownAgent(id))
    }

    pub(crate) fn body_of(&self, id: AgentId) -> RoadResult<Body> {
        self.body(id).ok_or(RoadError::UnknownAgent(id))
    }

    /// The agent directly ahead of `slot` in `lane`, seen from `front`.
    pub(crate) fn leader_of(&self, lane: LaneId, slot: SlotId, front: i64) -> Option<Leader> {
        let residents = &self.lanes[lane.index()].residents;
        let ahead = residents.prev(slot).and_then(|s| residents.get(s))?;
        let last_velocity = self.agents.get(&ahead.agent)?.last_velocity;
        Some(Leader { last_velocity, gap: ahead.rear - front })
    }

    /// Drop an agent at `front` on `lane`, bypassing admission.
    #[cfg(test)]
    pub(crate) fn place(&mut self, req: AgentRequest, lane: LaneId, front: i64, ctx: &mut TickContext<'_>) -> AgentId {
        let exit = req.route.map_or(lane, |(_, exit)| exit);
        let id = self
            .create_agent(AgentRequest { route: Some((lane, exit)), ..req }, ctx)
            .expect("test agent admitted");
        let residents = &mut self.lanes[lane.index()].residents;
        let body = residents.remove(self.agents[&id].slot).expect("resident");
        let slot = residents.insert(body.at(front)).expect("free spot");
        self.agents.get_mut(&id).expect("agent").slot = slot;
        id
    }
}
