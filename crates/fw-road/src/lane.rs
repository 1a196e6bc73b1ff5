//! Lane topology and per-lane runtime state.

use fw_core::{LaneId, Tick, Velocity};
use fw_index::PositionIndex;
use rustc_hash::FxHashMap;

use crate::body::Body;

// ── Configuration ─────────────────────────────────────────────────────────────

/// What happens to agents that reach the end of a lane, as configured.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutflowSpec {
    /// Transfer onto the named lane.  `offset` is the coordinate on the
    /// successor that lines up with this lane's end.
    Feeds { into: String, offset: i64 },
    /// Leave the simulation.  `weight` is the relative chance of the lane
    /// being drawn as an agent's exit.
    Absorbs { weight: f64 },
}

/// One lane as configured.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneParams {
    pub name: String,
    /// Feet.
    pub length: i64,
    /// Optional lane changes into this lane need at least this many
    /// passengers on board.
    pub min_passengers: u32,
    pub speed_limit: Velocity,
    /// Relative chance of the lane being drawn as an agent's entry.
    pub generate: f64,
    /// Ticks between admissions from the queue; below 1 disables metering.
    pub meter_interval: u64,
    /// Last velocity given to agents created in this lane.
    pub initial_velocity: Velocity,
    pub outflow: OutflowSpec,
}

impl LaneParams {
    /// An absorbing lane with no metering, no passenger threshold, and
    /// agents entering at rest.
    pub fn absorbing(name: impl Into<String>, length: i64, speed_limit: Velocity) -> Self {
        Self {
            name: name.into(),
            length,
            min_passengers: 0,
            speed_limit,
            generate: 0.0,
            meter_interval: 0,
            initial_velocity: Velocity::ZERO,
            outflow: OutflowSpec::Absorbs { weight: 1.0 },
        }
    }

    /// A lane feeding `into` at coordinate `offset`.
    pub fn feeding(
        name: impl Into<String>,
        length: i64,
        speed_limit: Velocity,
        into: impl Into<String>,
        offset: i64,
    ) -> Self {
        Self {
            outflow: OutflowSpec::Feeds { into: into.into(), offset },
            ..Self::absorbing(name, length, speed_limit)
        }
    }

    pub fn generate(mut self, weight: f64) -> Self {
        self.generate = weight;
        self
    }

    pub fn meter(mut self, interval: u64) -> Self {
        self.meter_interval = interval;
        self
    }

    pub fn min_passengers(mut self, n: u32) -> Self {
        self.min_passengers = n;
        self
    }

    pub fn initial_velocity(mut self, v: Velocity) -> Self {
        self.initial_velocity = v;
        self
    }
}

// ── Resolved topology ─────────────────────────────────────────────────────────

/// Resolved end-of-lane behavior.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outflow {
    Feed { into: LaneId, offset: i64 },
    Absorb { weight: f64 },
}

/// A side-by-side stretch shared with another lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    pub target: LaneId,
    /// First coordinate (inclusive) on this lane.
    pub start: i64,
    /// The stretch covers `start..=start + len`.
    pub len: i64,
    /// Coordinate on the target lane that lines up with `start`.
    pub target_start: i64,
}

impl Adjacency {
    #[inline]
    pub fn covers(&self, at: i64) -> bool {
        (self.start..=self.start + self.len).contains(&at)
    }

    /// Map a coordinate on this lane to the target lane.
    #[inline]
    pub fn convert(&self, at: i64) -> Option<i64> {
        self.covers(at).then(|| at - self.start + self.target_start)
    }
}

/// How to leave the simulation through a given exit lane from here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExitRule {
    /// Lane to move into when past `encourage`.
    pub change_to: LaneId,
    /// Past this coordinate the lane change becomes mandatory.
    pub encourage: i64,
    /// Agents never drive past this coordinate while in this lane.
    pub force: i64,
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// A lane: its configuration, topology, meter, and residents.
pub struct Lane {
    pub id:                LaneId,
    pub name:              String,
    pub length:            i64,
    pub min_passengers:    u32,
    pub speed_limit:       Velocity,
    pub initial_velocity:  Velocity,
    pub generate:          f64,
    pub meter_interval:    u64,
    pub outflow:           Outflow,
    pub(crate) meter_next: Tick,
    pub(crate) adjacent:   FxHashMap<LaneId, Adjacency>,
    pub(crate) exits:      FxHashMap<LaneId, ExitRule>,
    /// Candidate neighbors per coordinate, in registration order.
    pub(crate) along:      Vec<Vec<LaneId>>,
    pub(crate) residents:  PositionIndex<Body>,
}

impl Lane {
    pub(crate) fn new(id: LaneId, params: &LaneParams, outflow: Outflow) -> Self {
        Self {
            id,
            name:             params.name.clone(),
            length:           params.length,
            min_passengers:   params.min_passengers,
            speed_limit:      params.speed_limit,
            initial_velocity: params.initial_velocity,
            generate:         params.generate,
            meter_interval:   params.meter_interval,
            outflow,
            meter_next:       Tick::ZERO,
            adjacent:         FxHashMap::default(),
            exits:            FxHashMap::default(),
            along:            vec![Vec::new(); params.length.max(0) as usize],
            residents:        PositionIndex::new(),
        }
    }

    /// Absorption weight, 0 for feeding lanes.
    pub fn absorb_weight(&self) -> f64 {
        match self.outflow {
            Outflow::Absorb { weight } => weight,
            Outflow::Feed { .. } => 0.0,
        }
    }

    pub fn adjacency(&self, target: LaneId) -> Option<&Adjacency> {
        self.adjacent.get(&target)
    }

    pub fn exit_rule(&self, exit: LaneId) -> Option<ExitRule> {
        self.exits.get(&exit).copied()
    }

    pub fn reaches(&self, exit: LaneId) -> bool {
        self.exits.contains_key(&exit)
    }

    /// Lanes an agent at coordinate `at` could move into.
    pub fn neighbors_at(&self, at: i64) -> &[LaneId] {
        usize::try_from(at)
            .ok()
            .and_then(|i| self.along.get(i))
            .map_or(&[], Vec::as_slice)
    }

    /// The queue meter admits an agent at `now`.
    #[inline]
    pub fn meter_open(&self, now: Tick) -> bool {
        self.meter_next <= now
    }

    pub(crate) fn restart_meter(&mut self, now: Tick) {
        if self.meter_interval >= 1 {
            self.meter_next = now + self.meter_interval;
        }
    }

    pub fn residents(&self) -> &PositionIndex<Body> {
        &self.residents
    }

    /// Total residents, queued or not.
    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    /// Residents still in the entry queue.
    pub fn waiting(&self) -> usize {
        self.residents.iter().filter(|(_, b)| b.in_queue()).count()
    }

    /// Residents on the lane proper.
    pub fn moving(&self) -> usize {
        self.residents.iter().filter(|(_, b)| !b.in_queue()).count()
    }

    pub(crate) fn add_adjacency(&mut self, adj: Adjacency) {
        let last = adj.start + adj.len;
        if let Ok(last) = usize::try_from(last) {
            if self.along.len() <= last {
                self.along.resize(last + 1, Vec::new());
            }
        }
        for at in adj.start.max(0)..=last {
            self.along[at as usize].push(adj.target);
        }
        self.adjacent.insert(adj.target, adj);
    }
}
