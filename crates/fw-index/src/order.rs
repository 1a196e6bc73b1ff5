//! Three-outcome ordering contract.

/// Where `self` sorts relative to another item.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Placement {
    /// `self` sorts strictly before (closer to the head than) the other.
    Before,
    /// The two items occupy overlapping space and cannot coexist.
    Overlaps,
    /// `self` sorts strictly after the other.
    After,
}

impl Placement {
    /// The relation seen from the other side.
    #[inline]
    pub fn reverse(self) -> Placement {
        match self {
            Placement::Before => Placement::After,
            Placement::Overlaps => Placement::Overlaps,
            Placement::After => Placement::Before,
        }
    }
}

/// Types that can live in a [`PositionIndex`](crate::PositionIndex).
///
/// Implementations must be consistent: `a.placement(b)` is the reverse of
/// `b.placement(a)`, and for resident items sorted head to tail the relation
/// is transitive.
pub trait Ordered {
    fn placement(&self, other: &Self) -> Placement;
}
