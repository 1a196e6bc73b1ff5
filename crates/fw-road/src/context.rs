//! Per-tick context threaded through every roadway operation.

use fw_core::{SimRng, Tick};

/// The current tick plus the run's single random source.
///
/// Built by the orchestrator once per tick.  Holding the only `&mut SimRng`
/// makes the draw order exactly the call order.
pub struct TickContext<'a> {
    pub now: Tick,
    pub rng: &'a mut SimRng,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(now: Tick, rng: &'a mut SimRng) -> Self {
        Self { now, rng }
    }
}
