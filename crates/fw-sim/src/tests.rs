//! Integration tests for fw-sim.

use fw_core::{AgentId, SimConfig, Tick, Velocity};
use fw_driver::DriverParams;
use fw_road::{Agent, LaneParams, Roadway, RoadwayBuilder};

use crate::{FeedSchedule, FeedSegment, SimBuilder, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(report_interval_ticks: u64) -> SimConfig {
    SimConfig {
        seed: 42,
        report_interval_ticks,
        ..SimConfig::default()
    }
}

/// One 1000 ft absorbing lane with a 60 fps limit and a single driver.
fn one_lane() -> RoadwayBuilder {
    let mut b = RoadwayBuilder::new();
    b.add_lane(LaneParams::absorbing("main", 1_000, Velocity::from_fps(60.0)).generate(1.0))
        .unwrap();
    b.add_driver(DriverParams::named("d")).unwrap();
    b
}

/// Two side-by-side lanes, each able to exit through the other.
fn two_lanes() -> RoadwayBuilder {
    let mut b = RoadwayBuilder::new();
    let left = b
        .add_lane(LaneParams::absorbing("left", 4_000, Velocity::from_mph(65.0)).generate(1.0))
        .unwrap();
    let right = b
        .add_lane(LaneParams::absorbing("right", 4_000, Velocity::from_mph(55.0)).generate(2.0))
        .unwrap();
    b.add_adjacency(left, 0, right, 0, 4_000).unwrap();
    b.add_exit(left, right, right, 3_000, 3_500).unwrap();
    b.add_exit(right, left, left, 3_000, 3_500).unwrap();
    b.add_driver(DriverParams { weight: 3.0, lane_change: 0.05, accident: 0.001, ..DriverParams::named("calm") })
        .unwrap();
    b.add_driver(DriverParams {
        weight:       1.0,
        speed_offset: Velocity::from_mph(10.0),
        lane_change:  0.3,
        accident:     0.01,
        width:        6,
        ..DriverParams::named("hurried")
    })
    .unwrap();
    b
}

#[derive(Default)]
struct Recorder {
    starts:    u64,
    summaries: Vec<(Tick, TickSummary)>,
    snapshots: Vec<Tick>,
    removed:   Vec<(Tick, AgentId)>,
    ended:     Option<(Tick, u64)>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.summaries.push((tick, *summary));
    }

    fn on_snapshot(&mut self, tick: Tick, _roadway: &Roadway) {
        self.snapshots.push(tick);
    }

    fn on_agent_removed(&mut self, tick: Tick, agent: &Agent) {
        self.removed.push((tick, agent.id));
    }

    fn on_sim_end(&mut self, final_tick: Tick, stats: &crate::RunStats) {
        self.ended = Some((final_tick, stats.entered));
    }
}

// ── Feed schedule ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod feed {
    use fw_core::Tick;

    use crate::{FeedSchedule, FeedSegment, SimError};

    #[test]
    fn segments_cover_consecutive_ticks() {
        let s = FeedSchedule::new(vec![
            FeedSegment::new(0.5, 10),
            FeedSegment::new(9.0, 0),
            FeedSegment::new(2.0, 5),
        ])
        .unwrap();
        assert_eq!(s.total_ticks(), 15);
        assert_eq!(s.rate_at(Tick(1)), Some(0.5));
        assert_eq!(s.rate_at(Tick(10)), Some(0.5));
        assert_eq!(s.rate_at(Tick(11)), Some(2.0));
        assert_eq!(s.rate_at(Tick(15)), Some(2.0));
        assert_eq!(s.rate_at(Tick(16)), None);
    }

    #[test]
    fn empty_schedule_is_exhausted() {
        let s = FeedSchedule::new(Vec::new()).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.rate_at(Tick(1)), None);
    }

    #[test]
    fn rejects_bad_rates() {
        assert!(matches!(
            FeedSchedule::new(vec![FeedSegment::new(1.0, 5), FeedSegment::new(-1.0, 5)]),
            Err(SimError::InvalidFeed { index: 1, .. })
        ));
        assert!(FeedSchedule::constant(f64::NAN, 5).is_err());
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use fw_core::Tuning;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(test_config(60), one_lane())
            .schedule(FeedSchedule::constant(0.1, 10).unwrap())
            .build()
            .unwrap();
        assert_eq!(sim.now(), Tick(0));
        assert_eq!(sim.passengers.labels(), &[1, 2, 3, 4]);
        assert_eq!(sim.roadway.lane_count(), 1);
        assert_eq!(sim.stats().entries_by_lane, vec![0]);
    }

    #[test]
    fn schedule_required() {
        let result = SimBuilder::new(test_config(60), one_lane()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn feeding_needs_drivers() {
        let mut road = RoadwayBuilder::new();
        road.add_lane(LaneParams::absorbing("main", 1_000, Velocity::from_fps(60.0)).generate(1.0))
            .unwrap();
        let result = SimBuilder::new(test_config(60), road)
            .schedule(FeedSchedule::constant(1.0, 10).unwrap())
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn feeding_needs_entry_lanes() {
        let mut road = RoadwayBuilder::new();
        road.add_lane(LaneParams::absorbing("main", 1_000, Velocity::from_fps(60.0))).unwrap();
        road.add_driver(DriverParams::named("d")).unwrap();
        let result = SimBuilder::new(test_config(60), road)
            .schedule(FeedSchedule::constant(1.0, 10).unwrap())
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_tuning_rejected() {
        let config = SimConfig {
            tuning: Tuning { default_agent_length: 5, ..Tuning::default() },
            ..test_config(60)
        };
        let result = SimBuilder::new(config, one_lane())
            .schedule(FeedSchedule::constant(1.0, 10).unwrap())
            .build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn roadway_shares_config_tuning() {
        let config = SimConfig {
            tuning: Tuning { exit_encourage_offset: 250, ..Tuning::default() },
            ..test_config(60)
        };
        let sim = SimBuilder::new(config, one_lane())
            .schedule(FeedSchedule::constant(1.0, 10).unwrap())
            .build()
            .unwrap();
        let main = sim.roadway.lane_id("main").unwrap();
        let rule = sim.roadway.lane(main).unwrap().exit_rule(main).unwrap();
        assert_eq!(rule.encourage, 750);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use fw_road::AgentRequest;

    use super::*;

    #[test]
    fn lone_agent_end_to_end() {
        // One agent at tick 1, then 40 empty ticks.
        let schedule = FeedSchedule::new(vec![FeedSegment::new(1.0, 1), FeedSegment::new(0.0, 40)]).unwrap();
        let mut sim = SimBuilder::new(test_config(10), one_lane())
            .schedule(schedule)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        // Admitted at tick 1, accelerates 5 fps per tick to 60, and is
        // absorbed once its front reaches the force point at 1050.
        assert_eq!(rec.removed, vec![(Tick(24), AgentId(0))]);
        let stats = sim.stats();
        assert_eq!(stats.entered, 1);
        assert_eq!(stats.finished, 1);
        assert_eq!(stats.distance.mean(), Some(1_050.0));
        assert_eq!(stats.elapsed.mean(), Some(23.0));
        assert!((stats.efficiency.mean().unwrap() - 1_050.0 / 23.0).abs() < 1e-9);
        assert_eq!(stats.entries_by_lane, vec![1]);
        assert_eq!(stats.exits_by_lane, vec![1]);

        assert_eq!(sim.now(), Tick(41));
        assert_eq!(rec.starts, 41);
        assert_eq!(rec.summaries.len(), 41);
        let (first_tick, first) = rec.summaries[0];
        assert_eq!(first_tick, Tick(1));
        assert_eq!((first.created, first.admitted, first.resident), (1, 1, 1));
        assert_eq!(rec.summaries[23].1.absorbed, 1);
        assert_eq!(rec.summaries[23].1.resident, 0);
        assert_eq!(rec.snapshots, vec![Tick(10), Tick(20), Tick(30), Tick(40)]);
        assert_eq!(rec.ended, Some((Tick(41), 1)));
    }

    #[test]
    fn max_ticks_stops_early_and_tallies_unfinished() {
        let config = SimConfig { max_ticks: Some(50), ..test_config(0) };
        let mut sim = SimBuilder::new(config, two_lanes())
            .schedule(FeedSchedule::constant(0.5, 1_000).unwrap())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.now(), Tick(50));
        assert!(rec.snapshots.is_empty());
        let stats = sim.stats();
        assert!(stats.entered > 0);
        assert_eq!(stats.finished + sim.roadway.agent_count() as u64, stats.entered);
        // Every created agent is tallied exactly once.
        assert_eq!(stats.distance.count(), stats.entered);
        assert_eq!(stats.entries_by_lane.iter().sum::<u64>(), stats.entered);
        assert_eq!(stats.exits_by_lane.iter().sum::<u64>(), stats.entered);
    }

    #[test]
    fn summaries_agree_with_totals() {
        let mut sim = SimBuilder::new(test_config(60), two_lanes())
            .schedule(FeedSchedule::new(vec![FeedSegment::new(0.7, 300), FeedSegment::new(0.0, 200)]).unwrap())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let created: u64 = rec.summaries.iter().map(|(_, s)| u64::from(s.created)).sum();
        let absorbed: u64 = rec.summaries.iter().map(|(_, s)| u64::from(s.absorbed)).sum();
        assert_eq!(created, sim.stats().entered);
        assert_eq!(absorbed, sim.stats().finished);
        assert_eq!(absorbed, rec.removed.len() as u64);
        assert!(sim.stats().finished > 0);
    }

    #[test]
    fn same_seed_same_results() {
        let run = |seed: u64| {
            let config = SimConfig { seed, ..test_config(0) };
            let mut sim = SimBuilder::new(config, two_lanes())
                .schedule(FeedSchedule::constant(0.8, 400).unwrap())
                .build()
                .unwrap();
            sim.run(&mut crate::NoopObserver).unwrap();
            sim.stats().to_string()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn explicit_agent_with_no_elapsed_time() {
        let mut sim = SimBuilder::new(test_config(60), one_lane())
            .schedule(FeedSchedule::new(Vec::new()).unwrap())
            .build()
            .unwrap();
        let main = sim.roadway.lane_id("main").unwrap();
        let driver = sim.roadway.drivers().find("d").unwrap();
        sim.create_agent(AgentRequest { length: 20, driver, passengers: 2, route: Some((main, main)) })
            .unwrap();
        assert_eq!(sim.stats().entered, 1);

        sim.run(&mut crate::NoopObserver).unwrap();
        let stats = sim.stats();
        assert_eq!(sim.now(), Tick(0));
        assert_eq!(stats.finished, 0);
        assert_eq!(stats.distance.count(), 1);
        assert_eq!(stats.efficiency.count(), 0);
    }

    #[test]
    fn summary_line_format() {
        let stats = crate::RunStats::new(2);
        let line = stats.to_string();
        assert!(line.starts_with("D=<stats:#=0:"), "{line}");
        assert!(line.contains(" F=0 E=0 "), "{line}");
        assert!(line.contains(" EFF=<stats:"), "{line}");
    }
}
