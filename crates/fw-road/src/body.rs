//! Physical extent of an agent along its lane.

use fw_core::AgentId;
use fw_index::{Ordered, Placement};

/// The stretch `[rear, front]` an agent occupies, in whole feet.
///
/// Lane indexes hold `Body` values head first: the agent furthest along
/// the lane sorts before everyone behind it.  Touching end points count as
/// overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Body {
    pub agent: AgentId,
    pub front: i64,
    pub rear:  i64,
}

impl Body {
    #[inline]
    pub fn new(agent: AgentId, front: i64, length: i64) -> Self {
        Self { agent, front, rear: front - length }
    }

    /// Still waiting to enter the lane proper.
    #[inline]
    pub fn in_queue(&self) -> bool {
        self.front < 0
    }

    /// Blocks the next queued agent from entering.
    #[inline]
    pub fn tail_in_queue(&self) -> bool {
        self.rear < 1
    }

    #[inline]
    pub fn length(&self) -> i64 {
        self.front - self.rear
    }

    /// Same agent and length, front moved to `front`.
    #[inline]
    pub fn at(self, front: i64) -> Self {
        Self::new(self.agent, front, self.length())
    }
}

impl Ordered for Body {
    fn placement(&self, other: &Self) -> Placement {
        if other.front < self.rear {
            Placement::Before
        } else if other.rear > self.front {
            Placement::After
        } else {
            Placement::Overlaps
        }
    }
}
