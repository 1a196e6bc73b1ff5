//! Resolved driver profile and the car-following velocity policy.

use fw_core::{DriverId, Velocity, WeightedSampler};
use rand::Rng;

use crate::error::DriverResult;
use crate::params::DriverParams;
use crate::view::FollowView;

/// Immutable, resolved driver profile.
#[derive(Clone, Debug)]
pub struct DriverProfile {
    pub id:     DriverId,
    params:     DriverParams,
    /// Discretized Gaussian over `[-width, 0]` in 1 fps bins, centered on
    /// `floor(-width / 2)`.
    jitter:     WeightedSampler<Velocity>,
}

impl DriverProfile {
    pub fn new(id: DriverId, params: &DriverParams) -> DriverResult<Self> {
        params.validate()?;
        let params = params.resolved();

        let mean = (-params.width).div_euclid(2) as f64;
        let jitter = WeightedSampler::normal(
            mean,
            params.deviation,
            Velocity::from_fps(-(params.width as f64)),
            Velocity::from_fps(1.0),
            Velocity::ZERO,
            Velocity::fps,
        )?;

        Ok(Self { id, params, jitter })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.params.name
    }

    #[inline]
    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    pub fn jitter(&self) -> &WeightedSampler<Velocity> {
        &self.jitter
    }

    #[inline]
    pub fn accident(&self) -> f64 {
        self.params.accident
    }

    #[inline]
    pub fn breakdown(&self) -> f64 {
        self.params.breakdown
    }

    #[inline]
    pub fn lane_change(&self) -> f64 {
        self.params.lane_change
    }

    #[inline]
    pub fn change_lead(&self) -> f64 {
        self.params.change_lead
    }

    #[inline]
    pub fn change_trail(&self) -> f64 {
        self.params.change_trail
    }

    /// Cruising speed in a lane with the given limit.
    #[inline]
    pub fn cruise(&self, speed_limit: Velocity) -> Velocity {
        speed_limit + self.params.speed_offset
    }

    /// Speed ceiling for the next tick: one acceleration step above `last`,
    /// capped at the cruising speed.
    pub fn max_velocity(&self, last: Velocity, speed_limit: Velocity) -> Velocity {
        self.step_toward(last, self.cruise(speed_limit))
    }

    /// [`max_velocity`](Self::max_velocity) with the cruising speed already
    /// resolved.
    #[inline]
    pub fn step_toward(&self, last: Velocity, cruise: Velocity) -> Velocity {
        if last < cruise - self.params.accel_cap {
            last + self.params.accel_cap
        } else {
            cruise
        }
    }

    /// Target velocity for the next tick.
    ///
    /// With no leader the ceiling is returned.  Behind a leader the estimate
    /// is `leader velocity × follow_blend + gap`; if the ceiling is well
    /// below that (by more than `width + 1`) the ceiling is returned without
    /// drawing.  Otherwise one jitter sample is added and the result is
    /// clamped to `[0, ceiling]`.
    pub fn velocity<R: Rng + ?Sized>(&self, view: &FollowView, rng: &mut R) -> Velocity {
        let max = view.max_velocity;
        let Some(leader) = view.leader else {
            return max;
        };

        let guess =
            leader.last_velocity * self.params.follow_blend + Velocity::from_fps(leader.gap as f64);
        if max.fps() < guess.fps() - self.params.width as f64 - 1.0 {
            return max;
        }

        let result = guess + *self.jitter.choose_fast(rng);
        if result.fps() < 0.0 {
            Velocity::ZERO
        } else if result > max {
            max
        } else {
            result
        }
    }
}
