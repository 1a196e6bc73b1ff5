//! Configured driver parameters.

use fw_core::Velocity;

use crate::error::{DriverError, DriverResult};

/// One driver profile as configured.
///
/// Zero or negative `breakdown`, `change_lead`, or `change_trail` mean
/// "derive a default" (see [`DriverParams::resolved`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverParams {
    pub name: String,

    /// Relative selection weight among all profiles.
    pub weight: f64,

    /// Added to a lane's speed limit to get this driver's cruising speed.
    pub speed_offset: Velocity,

    /// Weight on the leader's last velocity when estimating a safe speed.
    pub follow_blend: f64,

    /// Jitter range in whole feet per second: jitter is drawn from
    /// `[-width, 0]`.
    pub width: i64,

    /// Standard deviation of the jitter distribution.
    pub deviation: f64,

    /// Per-event probability of an accident when forced to brake hard.
    pub accident: f64,

    /// Per-tick probability of a breakdown while moving.
    pub breakdown: f64,

    /// Per-tick probability of taking an optional lane change.
    pub lane_change: f64,

    /// Velocity gained per tick at most.
    pub accel_cap: Velocity,

    /// Required gap ahead after a lane change, in multiples of own velocity.
    pub change_lead: f64,

    /// Required gap behind after a lane change, in multiples of the
    /// follower's velocity.
    pub change_trail: f64,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            name:         String::new(),
            weight:       1.0,
            speed_offset: Velocity::ZERO,
            follow_blend: 0.5,
            width:        10,
            deviation:    3.0,
            accident:     0.0,
            breakdown:    0.0,
            lane_change:  0.0,
            accel_cap:    Velocity::from_fps(5.0),
            change_lead:  0.0,
            change_trail: 0.0,
        }
    }
}

impl DriverParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Copy with the derived defaults filled in:
    ///
    /// - breakdown `<= 0` becomes 1% of the accident probability,
    /// - lead margin `<= 0` becomes 0.5,
    /// - trail margin `<= 0` becomes the lead margin.
    pub fn resolved(&self) -> DriverParams {
        let mut p = self.clone();
        if p.breakdown <= 0.0 {
            p.breakdown = p.accident * 0.01;
        }
        if p.change_lead <= 0.0 {
            p.change_lead = 0.5;
        }
        if p.change_trail <= 0.0 {
            p.change_trail = p.change_lead;
        }
        p
    }

    pub fn validate(&self) -> DriverResult<()> {
        let fail = |reason: String| {
            Err(DriverError::InvalidParams { name: self.name.clone(), reason })
        };

        if self.name.is_empty() {
            return fail("name is empty".into());
        }
        if !(self.weight >= 0.0) {
            return fail(format!("weight must be non-negative, got {}", self.weight));
        }
        if self.width < 0 {
            return fail(format!("width must be non-negative, got {}", self.width));
        }
        if !(self.deviation > 0.0) {
            return fail(format!("deviation must be positive, got {}", self.deviation));
        }
        if self.accel_cap.fps() <= 0.0 {
            return fail(format!("accel_cap must be positive, got {}", self.accel_cap));
        }
        for (label, p) in [("accident", self.accident), ("lane_change", self.lane_change)] {
            if !(0.0..=1.0).contains(&p) {
                return fail(format!("{label} probability must be in [0, 1], got {p}"));
            }
        }
        if self.breakdown > 1.0 {
            return fail(format!("breakdown probability must be at most 1, got {}", self.breakdown));
        }
        Ok(())
    }
}
