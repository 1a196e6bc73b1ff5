//! Roadway error type.

use fw_core::{AgentId, DriverId, FwError, LaneId};
use fw_driver::DriverError;
use fw_index::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoadError {
    #[error("lane {0:?} is not registered")]
    UnknownLane(String),

    #[error("lane {0} is not registered")]
    UnknownLaneId(LaneId),

    #[error("lane {0:?} registered twice")]
    DuplicateLane(String),

    #[error("lane {name:?}: {reason}")]
    InvalidLane { name: String, reason: String },

    #[error("lanes {from} and {to} are already adjacent")]
    DuplicateAdjacency { from: LaneId, to: LaneId },

    #[error("agent length {length} is below the minimum of {min}")]
    AgentTooShort { length: i64, min: i64 },

    #[error("driver {0} is not registered")]
    UnknownDriver(DriverId),

    #[error("agent {0} is not resident")]
    UnknownAgent(AgentId),

    #[error("exit lane {exit} cannot be reached from entry lane {entry}")]
    Unroutable { entry: LaneId, exit: LaneId },

    #[error("no lane generates traffic")]
    NoEntryLanes,

    #[error("no lane absorbs traffic")]
    NoExitLanes,

    #[error("no generating lane can reach an absorbing lane")]
    NoRoute,

    #[error("lane index: {0}")]
    Index(#[from] IndexError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Core(#[from] FwError),
}

pub type RoadResult<T> = Result<T, RoadError>;
