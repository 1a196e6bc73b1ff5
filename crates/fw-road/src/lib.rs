//! `fw-road` — lanes, agents, and the per-tick update for the freeway lane
//! simulator.
//!
//! # Coordinates
//!
//! Every lane runs from 0 at its start to `length` at its end, in whole
//! feet.  An agent occupies `[rear, front]` with `rear = front - length`.
//! Agents whose front bumper is below 0 are *queued*: they have been
//! created but wait to be admitted onto the lane proper, one at a time,
//! behind the lane's meter.
//!
//! # Topology
//!
//! - **Adjacency**: two lanes run side by side over a stretch.  Agents may
//!   change lanes anywhere inside it; coordinates map across by offset.
//! - **Outflow**: a lane either feeds a successor (agents past its end are
//!   transferred) or absorbs them (they leave the simulation).
//! - **Exit rules**: for each reachable exit lane, the lane to move into,
//!   the point past which that move is mandatory, and a hard stop.
//!
//! # Modules
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`lane`]    | `LaneParams`, `Lane`, `Adjacency`, `ExitRule`          |
//! | [`agent`]   | `Agent`, `AgentRequest`, `AgentStatus`                 |
//! | [`body`]    | `Body`, the indexed extent of an agent                 |
//! | [`builder`] | `RoadwayBuilder`                                       |
//! | [`roadway`] | `Roadway`, agent creation and lookups                  |
//! | [`motion`]  | velocity choice, movement, queue admission, transfers  |
//! | [`tick`]    | the four-phase `step`, `StepReport`                    |
//! | [`context`] | `TickContext`                                          |
//! | [`error`]   | `RoadError`, `RoadResult`                              |

pub mod agent;
pub mod body;
pub mod builder;
pub mod context;
pub mod error;
pub mod lane;
pub mod motion;
pub mod roadway;
pub mod tick;


pub use agent::{Agent, AgentRequest, AgentStatus};
pub use body::Body;
pub use builder::RoadwayBuilder;
pub use context::TickContext;
pub use error::{RoadError, RoadResult};
pub use lane::{Adjacency, ExitRule, Lane, LaneParams, Outflow, OutflowSpec};
pub use motion::MoveOutcome;
pub use roadway::Roadway;
pub use tick::StepReport;
