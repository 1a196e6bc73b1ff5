//! Incremental roadway construction.

use fw_core::{DriverId, LaneId, Tuning, WeightedSampler};
use fw_driver::{DriverParams, DriverRegistry};
use rustc_hash::FxHashMap;

use crate::error::{RoadError, RoadResult};
use crate::lane::{Adjacency, ExitRule, Lane, LaneParams, Outflow, OutflowSpec};
use crate::roadway::Roadway;

struct RawAdjacency {
    a:       LaneId,
    a_start: i64,
    b:       LaneId,
    b_start: i64,
    len:     i64,
}

struct RawExit {
    from: LaneId,
    to:   LaneId,
    rule: ExitRule,
}

/// Construct a [`Roadway`] incrementally, then call [`build`](Self::build).
///
/// Lanes are added first and referenced by the returned [`LaneId`]s;
/// feeding lanes name their successor, which is resolved in `build()` so
/// lanes may be added in any order.
///
/// # Example
///
/// ```
/// use fw_core::Velocity;
/// use fw_driver::DriverParams;
/// use fw_road::{LaneParams, RoadwayBuilder};
///
/// let mut b = RoadwayBuilder::new();
/// let ramp = b
///     .add_lane(LaneParams::feeding("ramp", 600, Velocity::from_mph(45.0), "main", 800).generate(1.0))
///     .unwrap();
/// let main = b.add_lane(LaneParams::absorbing("main", 5_000, Velocity::from_mph(65.0))).unwrap();
/// b.add_exit(ramp, main, ramp, 500, 650).unwrap();
/// b.add_driver(DriverParams::named("typical")).unwrap();
/// let roadway = b.build().unwrap();
/// assert_eq!(roadway.lane_count(), 2);
/// ```
pub struct RoadwayBuilder {
    lanes:       Vec<LaneParams>,
    names:       FxHashMap<String, LaneId>,
    adjacencies: Vec<RawAdjacency>,
    exits:       Vec<RawExit>,
    drivers:     DriverRegistry,
    tuning:      Tuning,
}

impl RoadwayBuilder {
    pub fn new() -> Self {
        Self {
            lanes:       Vec::new(),
            names:       FxHashMap::default(),
            adjacencies: Vec::new(),
            exits:       Vec::new(),
            drivers:     DriverRegistry::new(),
            tuning:      Tuning::default(),
        }
    }

    /// Replace the behavior constants (defaults to `Tuning::default()`).
    pub fn tuning(&mut self, tuning: Tuning) -> &mut Self {
        self.tuning = tuning;
        self
    }

    /// Register a lane and return its id (sequential from 0).
    pub fn add_lane(&mut self, params: LaneParams) -> RoadResult<LaneId> {
        let invalid = |reason: String| RoadError::InvalidLane { name: params.name.clone(), reason };

        if params.name.is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if self.names.contains_key(&params.name) {
            return Err(RoadError::DuplicateLane(params.name.clone()));
        }
        if params.length < 1 {
            return Err(invalid(format!("length must be positive, got {}", params.length)));
        }
        if !(params.generate >= 0.0) {
            return Err(invalid(format!("generate weight must be non-negative, got {}", params.generate)));
        }
        if let OutflowSpec::Absorbs { weight } = params.outflow {
            if !(weight >= 0.0) {
                return Err(invalid(format!("absorb weight must be non-negative, got {weight}")));
            }
        }

        let id = LaneId::try_from(self.lanes.len())
            .map_err(|_| invalid("too many lanes".into()))?;
        self.names.insert(params.name.clone(), id);
        self.lanes.push(params);
        Ok(id)
    }

    pub fn lane_id(&self, name: &str) -> Option<LaneId> {
        self.names.get(name).copied()
    }

    /// Declare that `a[a_start ..= a_start + len]` runs alongside
    /// `b[b_start ..= b_start + len]`.  Registers both directions.
    pub fn add_adjacency(
        &mut self,
        a:       LaneId,
        a_start: i64,
        b:       LaneId,
        b_start: i64,
        len:     i64,
    ) -> RoadResult<()> {
        let name = self.known(a)?.name.clone();
        self.known(b)?;
        if a == b {
            return Err(RoadError::InvalidLane { name, reason: "lane cannot be adjacent to itself".into() });
        }
        if a_start < 0 || b_start < 0 || len < 0 {
            return Err(RoadError::InvalidLane {
                name,
                reason: format!("adjacency range must be non-negative ({a_start}, {b_start}, {len})"),
            });
        }
        let dup = self
            .adjacencies
            .iter()
            .any(|r| (r.a == a && r.b == b) || (r.a == b && r.b == a));
        if dup {
            return Err(RoadError::DuplicateAdjacency { from: a, to: b });
        }
        self.adjacencies.push(RawAdjacency { a, a_start, b, b_start, len });
        Ok(())
    }

    /// Agents in `from` heading for exit lane `to` move over to `change_to`
    /// once past `encourage` and never drive past `force`.
    ///
    /// Overrides the self-exit rule every lane gets by default.
    pub fn add_exit(
        &mut self,
        from:      LaneId,
        to:        LaneId,
        change_to: LaneId,
        encourage: i64,
        force:     i64,
    ) -> RoadResult<()> {
        self.known(from)?;
        self.known(to)?;
        self.known(change_to)?;
        self.exits.push(RawExit { from, to, rule: ExitRule { change_to, encourage, force } });
        Ok(())
    }

    pub fn add_driver(&mut self, params: DriverParams) -> RoadResult<DriverId> {
        Ok(self.drivers.register(&params)?)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Resolve successors, seed exit rules, and build the entry and exit
    /// distributions.
    ///
    /// Every lane first gets a rule for leaving through itself (change to
    /// itself, encourage `length - exit_encourage_offset`, force
    /// `length + exit_force_offset`); explicit exits are applied on top.
    pub fn build(self) -> RoadResult<Roadway> {
        let mut lanes = Vec::with_capacity(self.lanes.len());
        for (i, params) in self.lanes.iter().enumerate() {
            let id = LaneId(i as u32);
            let outflow = match &params.outflow {
                OutflowSpec::Feeds { into, offset } => {
                    let into_id = self
                        .names
                        .get(into)
                        .copied()
                        .ok_or_else(|| RoadError::UnknownLane(into.clone()))?;
                    if into_id == id {
                        return Err(RoadError::InvalidLane {
                            name:   params.name.clone(),
                            reason: "lane cannot feed itself".into(),
                        });
                    }
                    Outflow::Feed { into: into_id, offset: *offset }
                }
                OutflowSpec::Absorbs { weight } => Outflow::Absorb { weight: *weight },
            };

            let mut lane = Lane::new(id, params, outflow);
            lane.exits.insert(id, ExitRule {
                change_to: id,
                encourage: params.length - self.tuning.exit_encourage_offset,
                force:     params.length + self.tuning.exit_force_offset,
            });
            lanes.push(lane);
        }

        for r in &self.adjacencies {
            lanes[r.a.index()].add_adjacency(Adjacency {
                target:       r.b,
                start:        r.a_start,
                len:          r.len,
                target_start: r.b_start,
            });
            lanes[r.b.index()].add_adjacency(Adjacency {
                target:       r.a,
                start:        r.b_start,
                len:          r.len,
                target_start: r.a_start,
            });
        }

        for e in &self.exits {
            lanes[e.from.index()].exits.insert(e.to, e.rule);
        }

        let entries: Vec<(LaneId, f64)> = lanes
            .iter()
            .filter(|l| l.generate > 0.0)
            .map(|l| (l.id, l.generate))
            .collect();
        let exits: Vec<(LaneId, f64)> = lanes
            .iter()
            .filter(|l| l.absorb_weight() > 0.0)
            .map(|l| (l.id, l.absorb_weight()))
            .collect();

        if !entries.is_empty() && !exits.is_empty() {
            let routable = entries
                .iter()
                .any(|(g, _)| exits.iter().any(|(a, _)| lanes[g.index()].reaches(*a)));
            if !routable {
                return Err(RoadError::NoRoute);
            }
        }

        let generate = sampler(entries)?;
        let absorb = sampler(exits)?;

        Ok(Roadway::new(lanes, self.names, self.drivers, generate, absorb, self.tuning))
    }

    fn known(&self, id: LaneId) -> RoadResult<&LaneParams> {
        self.lanes.get(id.index()).ok_or(RoadError::UnknownLaneId(id))
    }
}

impl Default for RoadwayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized distribution over lanes, `None` when no lane has weight.
fn sampler(weighted: Vec<(LaneId, f64)>) -> RoadResult<Option<WeightedSampler<LaneId>>> {
    if weighted.is_empty() {
        return Ok(None);
    }
    let (ids, weights): (Vec<LaneId>, Vec<f64>) = weighted.into_iter().unzip();
    Ok(Some(WeightedSampler::normalize(weights, ids)?))
}
