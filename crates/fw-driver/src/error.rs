use fw_core::FwError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver profile {name:?}: {reason}")]
    InvalidParams { name: String, reason: String },

    #[error("driver profile {0:?} registered twice")]
    Duplicate(String),

    #[error("no driver profiles registered")]
    NoDrivers,

    #[error(transparent)]
    Core(#[from] FwError),
}

pub type DriverResult<T> = Result<T, DriverError>;
