//! The `Sim` struct and its tick loop.

use fw_core::{AgentId, SimClock, SimConfig, SimRng, Tick, WeightedSampler};
use fw_road::{AgentRequest, Roadway, StepReport, TickContext};
use tracing::{debug, info, warn};

use crate::feed::FeedSchedule;
use crate::observer::{SimObserver, TickSummary};
use crate::stats::RunStats;
use crate::SimResult;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick:
///
/// 1. **Rate**: look up the feed rate for the next tick; an exhausted
///    schedule ends the run.
/// 2. **Feed**: create `floor(rate)` agents, plus one more with probability
///    `frac(rate)`.  Each draws a passenger count, a driver, and a
///    reachable entry/exit pair, and joins its entry lane's queue.
/// 3. **Step**: run the roadway's four phases over every lane.
/// 4. **Tally**: record absorbed agents and notify the observer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (seed, stop condition, report cadence, tuning).
    pub config: SimConfig,

    /// Simulation clock.  Holds the last completed tick.
    pub clock: SimClock,

    /// Lanes, drivers, and every resident agent.
    pub roadway: Roadway,

    /// Entry rate over time.
    pub schedule: FeedSchedule,

    /// Passenger-count distribution for fed agents.
    pub passengers: WeightedSampler<u32>,

    rng:   SimRng,
    stats: RunStats,
}

impl Sim {
    pub(crate) fn new(
        config:     SimConfig,
        roadway:    Roadway,
        schedule:   FeedSchedule,
        passengers: WeightedSampler<u32>,
    ) -> Self {
        Self {
            rng:   SimRng::new(config.seed),
            stats: RunStats::new(roadway.lane_count()),
            clock: SimClock::new(),
            config,
            roadway,
            schedule,
            passengers,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Run until the feed schedule is exhausted or `config.max_ticks` is
    /// reached, then tally the agents still on the road.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            seed    = self.config.seed,
            lanes   = self.roadway.lane_count(),
            drivers = self.roadway.drivers().len(),
            ticks   = self.schedule.total_ticks(),
            "run start"
        );

        loop {
            if let Some(max) = self.config.max_ticks {
                let now = self.clock.now();
                if now.0 >= max {
                    if self.schedule.rate_at(now + 1).is_some() {
                        warn!(tick = %now, max, "stopped at max_ticks before the feed schedule ended");
                    }
                    break;
                }
            }
            if !self.tick(observer)? {
                break;
            }
        }

        let now = self.clock.now();
        for agent in self.roadway.residents() {
            self.stats.record_departure(agent, now, false);
        }
        observer.on_sim_end(now, &self.stats);
        info!(
            tick     = %now,
            clock    = %self.clock,
            entered  = self.stats.entered,
            finished = self.stats.finished,
            resident = self.roadway.agent_count(),
            "run complete: {}",
            self.stats
        );
        Ok(())
    }

    /// Simulate one tick.  Returns `false`, without advancing the clock,
    /// once the feed schedule is exhausted.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let Some(rate) = self.schedule.rate_at(self.clock.now() + 1) else {
            return Ok(false);
        };
        let now = self.clock.advance();
        observer.on_tick_start(now);

        let whole = rate.floor();
        let created = whole as u32 + u32::from(self.rng.chance(rate - whole));

        let mut ctx = TickContext::new(now, &mut self.rng);
        for _ in 0..created {
            let passengers = *self.passengers.choose(ctx.rng.inner()).1;
            let driver = self.roadway.drivers().select(ctx.rng.inner())?;
            let req = AgentRequest {
                length: self.config.tuning.default_agent_length,
                driver,
                passengers,
                route: None,
            };
            let id = self.roadway.create_agent(req, &mut ctx)?;
            if let Some(agent) = self.roadway.agent(id) {
                self.stats.record_entry(agent);
            }
        }

        let report = self.roadway.step(&mut ctx)?;
        for agent in &report.absorbed {
            self.stats.record_departure(agent, now, true);
            observer.on_agent_removed(now, agent);
        }

        let summary = self.summarize(created, &report);
        observer.on_tick_end(now, &summary);

        if now.is_multiple_of(self.config.report_interval_ticks) {
            self.report(now);
            observer.on_snapshot(now, &self.roadway);
        }
        Ok(true)
    }

    /// Create an agent outside the feed (explicit route or drawn), stamped
    /// with the current tick.
    pub fn create_agent(&mut self, req: AgentRequest) -> SimResult<AgentId> {
        let mut ctx = TickContext::new(self.clock.now(), &mut self.rng);
        let id = self.roadway.create_agent(req, &mut ctx)?;
        if let Some(agent) = self.roadway.agent(id) {
            self.stats.record_entry(agent);
        }
        Ok(id)
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    fn summarize(&self, created: u32, report: &StepReport) -> TickSummary {
        TickSummary {
            created,
            admitted:     report.admitted,
            absorbed:     report.absorbed.len() as u32,
            lane_changes: report.lane_changes,
            feeds:        report.feeds,
            accidents:    report.accidents,
            breakdowns:   report.breakdowns,
            resident:     self.roadway.agent_count() as u32,
        }
    }

    fn report(&self, now: Tick) {
        info!(
            tick     = %now,
            clock    = %self.clock,
            entered  = self.stats.entered,
            finished = self.stats.finished,
            resident = self.stats.in_flight(),
            "progress"
        );
        for lane in self.roadway.lanes() {
            let i = lane.id.index();
            debug!(
                lane    = %lane.name,
                waiting = lane.waiting(),
                moving  = lane.moving(),
                entries = self.stats.entries_by_lane.get(i).copied().unwrap_or(0),
                exits   = self.stats.exits_by_lane.get(i).copied().unwrap_or(0),
                "lane"
            );
        }
    }
}
