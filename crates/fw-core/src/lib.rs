//! `fw-core` — foundational types for the freeway lane simulator.
//!
//! Every other `fw-*` crate depends on this one.  It has no `fw-*`
//! dependencies and few external ones (`rand`, `rustc-hash`, `thiserror`,
//! `libm`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `LaneId`, `DriverId`                        |
//! | [`time`]        | `Tick`, `SimClock`                                     |
//! | [`config`]      | `SimConfig`, `Tuning`                                  |
//! | [`rng`]         | `SimRng` (the single source of randomness)             |
//! | [`velocity`]    | `Velocity` scalar in feet per second                   |
//! | [`sampler`]     | `WeightedSampler` discrete distribution                |
//! | [`stats`]       | `Statistics` running accumulator                       |
//! | [`error`]       | `FwError`, `FwResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, ticks, and config.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod sampler;
pub mod stats;
pub mod time;
pub mod velocity;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SimConfig, Tuning};
pub use error::{FwError, FwResult};
pub use ids::{AgentId, DriverId, LaneId};
pub use rng::SimRng;
pub use sampler::WeightedSampler;
pub use stats::Statistics;
pub use time::{SimClock, Tick};
pub use velocity::Velocity;
