//! `fw-index` — an ordered, collision-checked list of lane occupants.
//!
//! # Layout
//!
//! `PositionIndex<T>` is a doubly linked list stored in an arena of slots.
//! Links are slot indices, not pointers, so the structure is plain safe
//! Rust and removal never moves other items.  Handles (`SlotId`) carry a
//! generation counter: a handle to a removed item never aliases whatever
//! reuses its slot.
//!
//! # Ordering contract
//!
//! Element types implement [`Ordered`], a three-outcome relation.  Two
//! items that `Overlap` may never both be resident; an insert that would
//! create such a pair is refused and leaves the index untouched.
//!
//! # Lookup
//!
//! Lookups start from the slot touched last (the *hint*) and walk outward.
//! Simulation access is strongly local (the same few agents are found again
//! and again as they shift slightly), so the walk is usually one or two
//! steps.
//!
//! | Module     | Contents                                  |
//! |------------|-------------------------------------------|
//! | [`order`]  | `Placement`, `Ordered`                    |
//! | [`index`]  | `PositionIndex`, `SlotId`, iterators      |
//! | [`error`]  | `IndexError`, `IndexResult`               |

pub mod error;
pub mod index;
pub mod order;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use index::{Iter, IterRev, PositionIndex, SlotId};
pub use order::{Ordered, Placement};
