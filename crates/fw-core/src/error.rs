//! Core error type.
//!
//! Sub-crates define their own enums and wrap `FwError` as one variant via
//! `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

/// Errors raised by the core primitives.
#[derive(Debug, Error)]
pub enum FwError {
    #[error("weight at index {index} is negative ({weight})")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("weights sum to {sum}, expected 1 within {epsilon}")]
    NotNormalized { sum: f64, epsilon: f64 },

    #[error("{labels} labels supplied for {weights} weights")]
    LabelCountMismatch { weights: usize, labels: usize },

    #[error("distribution has no outcomes")]
    EmptyDistribution,

    #[error("weights sum to zero and cannot be normalized")]
    ZeroTotalWeight,

    #[error("normal distribution needs a positive deviation and step, got deviation {deviation} step {step}")]
    InvalidNormal { deviation: f64, step: f64 },

    #[error("malformed statistics record: {0}")]
    StatsParse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fw-core`.
pub type FwResult<T> = Result<T, FwError>;
