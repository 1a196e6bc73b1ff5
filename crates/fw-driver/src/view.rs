//! The slice of road state a driver reacts to.

use fw_core::Velocity;

/// The agent directly ahead in the same lane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Leader {
    /// Displacement the leader realized last tick.
    pub last_velocity: Velocity,
    /// Feet from the follower's front bumper to the leader's rear bumper.
    pub gap: i64,
}

/// Input to [`DriverProfile::velocity`](crate::DriverProfile::velocity).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FollowView {
    /// Ceiling from [`DriverProfile::max_velocity`](crate::DriverProfile::max_velocity).
    pub max_velocity: Velocity,
    pub leader:       Option<Leader>,
}

impl FollowView {
    pub fn free(max_velocity: Velocity) -> Self {
        Self { max_velocity, leader: None }
    }

    pub fn behind(max_velocity: Velocity, leader: Leader) -> Self {
        Self { max_velocity, leader: Some(leader) }
    }
}
