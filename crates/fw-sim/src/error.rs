use fw_core::FwError;
use fw_driver::DriverError;
use fw_road::RoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid feed segment {index}: {reason}")]
    InvalidFeed { index: usize, reason: String },

    #[error(transparent)]
    Road(#[from] RoadError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Core(#[from] FwError),
}

pub type SimResult<T> = Result<T, SimError>;
