//! `fw-sim` — tick loop orchestrator for the freeway lane simulator.
//!
//! # Tick loop
//!
//! ```text
//! while the feed schedule has a rate for the next tick:
//!   ① Feed    — floor(rate) agents, plus one with probability frac(rate);
//!               each draws passengers, a driver, and a reachable route.
//!   ② Step    — choose / change / move / remove over every lane.
//!   ③ Tally   — absorbed agents go into RunStats and on_agent_removed.
//!   ④ Report  — every report_interval_ticks: progress log and on_snapshot.
//! agents still on the road are tallied as unfinished
//! ```
//!
//! Every random draw comes from one `SimRng` seeded from `SimConfig::seed`,
//! so a seed fully determines a run.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(config, roadway_builder)
//!     .schedule(FeedSchedule::new(segments)?)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{}", sim.stats());
//! ```

pub mod builder;
pub mod error;
pub mod feed;
pub mod observer;
pub mod sim;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use feed::{FeedSchedule, FeedSegment};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::Sim;
pub use stats::RunStats;
