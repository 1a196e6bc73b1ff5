//! Run configuration.
//!
//! Built in code by the application (or deserialized when the `serde`
//! feature is on) and handed to `SimBuilder`.

use crate::error::{FwError, FwResult};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Behavior constants shared by every agent and lane.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tuning {
    /// Ticks an agent stays immobile after an accident or breakdown.
    pub repair_ticks: u64,

    /// An agent clamped behind its leader rolls for an accident when the
    /// realized displacement falls below this share of the intended one.
    pub accident_ratio: f64,

    /// Occupancy difference above which a less crowded neighbor gets the
    /// congestion bias in lane-change decisions.
    pub congestion_margin: usize,

    /// Multiplier on the lane-change probability when the bias applies.
    pub congestion_bias: f64,

    /// Self-exit rule of every lane: start moving over this far before the end.
    pub exit_encourage_offset: i64,

    /// Self-exit rule of every lane: hard stop this far past the end.
    pub exit_force_offset: i64,

    /// Agents shorter than this are rejected at creation (feet).
    pub min_agent_length: i64,

    /// Length given to agents admitted by the feed schedule (feet).
    pub default_agent_length: i64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            repair_ticks:          300,
            accident_ratio:        0.5,
            congestion_margin:     20,
            congestion_bias:       10.0,
            exit_encourage_offset: 100,
            exit_force_offset:     50,
            min_agent_length:      10,
            default_agent_length:  15,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Hard stop.  `None` runs until the feed schedule is exhausted.
    pub max_ticks: Option<u64>,

    /// Emit a progress report (log line plus observer snapshot) every N
    /// ticks.  0 disables reporting.
    pub report_interval_ticks: u64,

    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                  0,
            max_ticks:             None,
            report_interval_ticks: 60,
            tuning:                Tuning::default(),
        }
    }
}

impl SimConfig {
    /// Reject values that would make the tick protocol meaningless.
    pub fn validate(&self) -> FwResult<()> {
        let t = &self.tuning;
        if t.min_agent_length < 1 {
            return Err(FwError::Config(format!(
                "min_agent_length must be positive, got {}",
                t.min_agent_length
            )));
        }
        if t.default_agent_length < t.min_agent_length {
            return Err(FwError::Config(format!(
                "default_agent_length {} is below min_agent_length {}",
                t.default_agent_length, t.min_agent_length
            )));
        }
        if !(0.0..=1.0).contains(&t.accident_ratio) {
            return Err(FwError::Config(format!(
                "accident_ratio must be in [0, 1], got {}",
                t.accident_ratio
            )));
        }
        if t.congestion_bias < 1.0 {
            return Err(FwError::Config(format!(
                "congestion_bias must be at least 1, got {}",
                t.congestion_bias
            )));
        }
        Ok(())
    }
}
