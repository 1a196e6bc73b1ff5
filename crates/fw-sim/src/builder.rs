//! Fluent builder for constructing a [`Sim`].

use fw_core::{SimConfig, WeightedSampler};
use fw_road::RoadwayBuilder;

use crate::feed::FeedSchedule;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, stop condition, report cadence, tuning
/// - [`RoadwayBuilder`]: lanes, adjacencies, exits, and drivers.  It is
///   built here so the roadway and the run share `config.tuning`.
/// - [`FeedSchedule`] via [`schedule`](Self::schedule)
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                   |
/// |-------------------|-------------------------------------------|
/// | `.passengers(s)`  | weights `[80, 15, 3, 2]` over `[1, 2, 3, 4]` |
///
/// # Example
///
/// ```rust
/// use fw_core::{SimConfig, Velocity};
/// use fw_driver::DriverParams;
/// use fw_road::{LaneParams, RoadwayBuilder};
/// use fw_sim::{FeedSchedule, NoopObserver, SimBuilder};
///
/// let mut road = RoadwayBuilder::new();
/// road.add_lane(LaneParams::absorbing("main", 2_000, Velocity::from_mph(60.0)).generate(1.0))
///     .unwrap();
/// road.add_driver(DriverParams::named("typical")).unwrap();
///
/// let mut sim = SimBuilder::new(SimConfig::default(), road)
///     .schedule(FeedSchedule::constant(0.2, 300).unwrap())
///     .build()
///     .unwrap();
/// sim.run(&mut NoopObserver).unwrap();
/// assert_eq!(sim.stats().distance.count(), sim.stats().entered);
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    roadway:    RoadwayBuilder,
    schedule:   Option<FeedSchedule>,
    passengers: Option<WeightedSampler<u32>>,
}

impl SimBuilder {
    /// Create a builder with all required inputs but the schedule.
    pub fn new(config: SimConfig, roadway: RoadwayBuilder) -> Self {
        Self {
            config,
            roadway,
            schedule:   None,
            passengers: None,
        }
    }

    pub fn schedule(mut self, schedule: FeedSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Replace the passenger-count distribution.
    pub fn passengers(mut self, passengers: WeightedSampler<u32>) -> Self {
        self.passengers = Some(passengers);
        self
    }

    /// Validate inputs, build the roadway, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let schedule = self
            .schedule
            .ok_or_else(|| SimError::Config("no feed schedule".into()))?;

        let mut roadway = self.roadway;
        roadway.tuning(self.config.tuning.clone());
        let roadway = roadway.build()?;

        let feeds = schedule.segments().iter().any(|s| s.rate > 0.0 && s.ticks > 0);
        if feeds {
            if roadway.drivers().is_empty() {
                return Err(SimError::Config("feed schedule admits agents but no drivers are registered".into()));
            }
            if roadway.entry_distribution().is_none() {
                return Err(SimError::Config("feed schedule admits agents but no lane generates traffic".into()));
            }
            if roadway.exit_distribution().is_none() {
                return Err(SimError::Config("feed schedule admits agents but no lane absorbs traffic".into()));
            }
        }

        let passengers = match self.passengers {
            Some(p) => p,
            None => WeightedSampler::normalize(vec![80.0, 15.0, 3.0, 2.0], vec![1, 2, 3, 4])?,
        };

        Ok(Sim::new(self.config, roadway, schedule, passengers))
    }
}
