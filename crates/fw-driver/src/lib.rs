//! `fw-driver` — driver profiles and the velocity policy.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`params`]   | `DriverParams` — the configured, unresolved profile        |
//! | [`profile`]  | `DriverProfile` — resolved profile plus jitter sampler     |
//! | [`view`]     | `FollowView`, `Leader` — what the policy sees of the road  |
//! | [`registry`] | `DriverRegistry` — name lookup and weighted selection      |
//! | [`error`]    | `DriverError`, `DriverResult<T>`                           |
//!
//! # Design notes
//!
//! The policy never touches a lane.  The roadway condenses the situation
//! into a [`FollowView`] (the agent's current speed ceiling and, if any,
//! the leader's last velocity and the gap to its rear bumper) and the
//! profile turns that into a target velocity.  This keeps the policy pure
//! apart from its one jitter draw, which makes draw accounting easy to
//! audit: a free road or a comfortable gap draws nothing.

pub mod error;
pub mod params;
pub mod profile;
pub mod registry;
pub mod view;


pub use error::{DriverError, DriverResult};
pub use params::DriverParams;
pub use profile::DriverProfile;
pub use registry::DriverRegistry;
pub use view::{FollowView, Leader};
