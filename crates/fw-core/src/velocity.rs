//! Velocity scalar.
//!
//! Stored in feet per second.  One tick is one second, so `fps_i()` is also
//! the whole-foot displacement an agent covers in a tick.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Feet per second in one mile per hour.
const FPS_PER_MPH: f64 = 22.0 / 15.0;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity(f64);

impl Velocity {
    pub const ZERO: Velocity = Velocity(0.0);

    #[inline]
    pub const fn from_fps(fps: f64) -> Self {
        Velocity(fps)
    }

    #[inline]
    pub fn from_mph(mph: f64) -> Self {
        Velocity(mph * FPS_PER_MPH)
    }

    #[inline]
    pub fn fps(self) -> f64 {
        self.0
    }

    /// Rounded to the nearest whole foot per second (half away from zero).
    #[inline]
    pub fn fps_i(self) -> i64 {
        self.0.round() as i64
    }

    #[inline]
    pub fn mph(self) -> f64 {
        self.0 / FPS_PER_MPH
    }

    #[inline]
    pub fn max(self, other: Velocity) -> Velocity {
        if self >= other { self } else { other }
    }

    #[inline]
    pub fn min(self, other: Velocity) -> Velocity {
        if self <= other { self } else { other }
    }
}

impl PartialOrd for Velocity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Velocity {
    type Output = Velocity;
    #[inline]
    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;
    #[inline]
    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;
    #[inline]
    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fps", self.0)
    }
}
