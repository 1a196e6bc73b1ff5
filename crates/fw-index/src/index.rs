//! Arena-backed ordered list.

use std::cell::Cell;
use std::fmt;

use crate::error::{IndexError, IndexResult};
use crate::order::{Ordered, Placement};

// ── SlotId ───────────────────────────────────────────────────────────────────

/// Handle to a resident item.
///
/// Stays valid until the item is removed; after that every lookup with it
/// returns `None` even if the slot is reused.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SlotId {
    index:      u32,
    generation: u32,
}

impl SlotId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({}#{})", self.index, self.generation)
    }
}

// ── PositionIndex ────────────────────────────────────────────────────────────

struct Slot<T> {
    item:       Option<T>,
    generation: u32,
    prev:       Option<u32>,
    next:       Option<u32>,
}

/// Ordered, overlap-free list of `T`, head first.
pub struct PositionIndex<T> {
    slots: Vec<Slot<T>>,
    free:  Vec<u32>,
    head:  Option<u32>,
    tail:  Option<u32>,
    len:   usize,
    /// Slot touched by the last lookup or mutation.  Always a live slot or
    /// `None`; every mutation resets it.
    hint:  Cell<Option<u32>>,
}

impl<T> Default for PositionIndex<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free:  Vec::new(),
            head:  None,
            tail:  None,
            len:   0,
            hint:  Cell::new(None),
        }
    }
}

impl<T> PositionIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), ..Self::default() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every item.  Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.item.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
            slot.prev = None;
            slot.next = None;
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.hint.set(None);
    }

    pub fn head(&self) -> Option<SlotId> {
        self.head.map(|i| self.id(i))
    }

    pub fn tail(&self) -> Option<SlotId> {
        self.tail.map(|i| self.id(i))
    }

    pub fn get(&self, slot: SlotId) -> Option<&T> {
        self.resolve(slot).and_then(|i| self.item(i))
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.resolve(slot).is_some()
    }

    /// The neighbor closer to the head.
    pub fn prev(&self, slot: SlotId) -> Option<SlotId> {
        let i = self.resolve(slot)?;
        self.slots[i as usize].prev.map(|p| self.id(p))
    }

    /// The neighbor closer to the tail.
    pub fn next(&self, slot: SlotId) -> Option<SlotId> {
        let i = self.resolve(slot)?;
        self.slots[i as usize].next.map(|n| self.id(n))
    }

    /// Remove the item behind `slot`.  Returns `None` for a stale handle.
    pub fn remove(&mut self, slot: SlotId) -> Option<T> {
        let i = self.resolve(slot)?;
        let (prev, next) = {
            let s = &self.slots[i as usize];
            (s.prev, s.next)
        };

        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }

        let s = &mut self.slots[i as usize];
        let item = s.item.take();
        s.generation = s.generation.wrapping_add(1);
        s.prev = None;
        s.next = None;
        self.free.push(i);
        self.len -= 1;
        self.hint.set(prev.or(next));
        item
    }

    /// Head-to-tail traversal.  Each call starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { index: self, cur: self.head, remaining: self.len }
    }

    /// Tail-to-head traversal.
    pub fn iter_rev(&self) -> IterRev<'_, T> {
        IterRev { index: self, cur: self.tail, remaining: self.len }
    }

    // ── internals ─────────────────────────────────────────────────────────

    #[inline]
    fn id(&self, i: u32) -> SlotId {
        SlotId { index: i, generation: self.slots[i as usize].generation }
    }

    #[inline]
    fn item(&self, i: u32) -> Option<&T> {
        self.slots.get(i as usize).and_then(|s| s.item.as_ref())
    }

    fn resolve(&self, slot: SlotId) -> Option<u32> {
        let s = self.slots.get(slot.index as usize)?;
        (s.generation == slot.generation && s.item.is_some()).then_some(slot.index)
    }

    fn alloc(&mut self, item: T, prev: Option<u32>, next: Option<u32>) -> IndexResult<u32> {
        if let Some(i) = self.free.pop() {
            let s = &mut self.slots[i as usize];
            s.item = Some(item);
            s.prev = prev;
            s.next = next;
            return Ok(i);
        }
        let i = u32::try_from(self.slots.len()).map_err(|_| IndexError::Full)?;
        self.slots.push(Slot { item: Some(item), generation: 0, prev, next });
        Ok(i)
    }
}

impl<T: Ordered> PositionIndex<T> {
    /// Insert `item` between the residents it sorts between.
    ///
    /// Fails with [`IndexError::Collision`] if it overlaps either neighbor;
    /// the index is unchanged in that case.
    pub fn insert(&mut self, item: T) -> IndexResult<SlotId> {
        let prev = self.locate(&item);
        let next = match prev {
            Some(p) => self.slots[p as usize].next,
            None => self.head,
        };

        if let Some(p) = prev.and_then(|p| self.item(p)) {
            if item.placement(p) != Placement::After {
                return Err(IndexError::Collision);
            }
        }
        if let Some(n) = next.and_then(|n| self.item(n)) {
            if item.placement(n) != Placement::Before {
                return Err(IndexError::Collision);
            }
        }

        let i = self.alloc(item, prev, next)?;
        match prev {
            Some(p) => self.slots[p as usize].next = Some(i),
            None => self.head = Some(i),
        }
        match next {
            Some(n) => self.slots[n as usize].prev = Some(i),
            None => self.tail = Some(i),
        }
        self.len += 1;
        self.hint.set(Some(i));
        Ok(self.id(i))
    }

    /// Like [`PositionIndex::insert`] but reports a collision as `None`.
    pub fn insert_if_possible(&mut self, item: T) -> Option<SlotId> {
        self.insert(item).ok()
    }

    /// Replace the item behind `slot` without relinking.  The new value
    /// must still sort strictly between the current neighbors.
    pub fn reposition(&mut self, slot: SlotId, item: T) -> IndexResult<()> {
        let i = self.resolve(slot).ok_or(IndexError::StaleSlot)?;
        let (prev, next) = {
            let s = &self.slots[i as usize];
            (s.prev, s.next)
        };
        if let Some(p) = prev.and_then(|p| self.item(p)) {
            if item.placement(p) != Placement::After {
                return Err(IndexError::OutOfOrder);
            }
        }
        if let Some(n) = next.and_then(|n| self.item(n)) {
            if item.placement(n) != Placement::Before {
                return Err(IndexError::OutOfOrder);
            }
        }
        self.slots[i as usize].item = Some(item);
        self.hint.set(Some(i));
        Ok(())
    }

    /// Nearest resident that `key` does not sort before: the item `key`
    /// would follow if inserted, or one it overlaps.
    pub fn find_at_or_before(&self, key: &T) -> Option<SlotId> {
        self.locate(key).map(|i| self.id(i))
    }

    /// Nearest resident that `key` does not sort after: the item `key`
    /// would precede if inserted, or the first one it overlaps.
    pub fn find_at_or_after(&self, key: &T) -> Option<SlotId> {
        match self.locate(key) {
            Some(mut i) if self.item(i).map(|it| key.placement(it)) == Some(Placement::Overlaps) => {
                while let Some(p) = self.slots[i as usize].prev {
                    if self.item(p).map(|it| key.placement(it)) != Some(Placement::Overlaps) {
                        break;
                    }
                    i = p;
                }
                Some(self.id(i))
            }
            Some(i) => self.slots[i as usize].next.map(|n| self.id(n)),
            None => self.head.map(|h| self.id(h)),
        }
    }

    /// Walk the chain and confirm strict order, link symmetry, and size.
    pub fn verify(&self) -> IndexResult<()> {
        let corrupt = |msg: String| Err(IndexError::Corrupt(msg));

        let mut count = 0usize;
        let mut prev: Option<u32> = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            if count > self.slots.len() {
                return corrupt("cycle in next links".into());
            }
            let Some(item) = self.item(c) else {
                return corrupt(format!("linked slot {c} is empty"));
            };
            if self.slots[c as usize].prev != prev {
                return corrupt(format!("slot {c} has a mismatched prev link"));
            }
            if let Some(before) = prev.and_then(|p| self.item(p)) {
                if before.placement(item) != Placement::Before {
                    return corrupt(format!("slot {c} is out of order with its predecessor"));
                }
            }
            prev = Some(c);
            cur = self.slots[c as usize].next;
            count += 1;
        }

        if self.tail != prev {
            return corrupt("tail does not match the last linked slot".into());
        }
        if count != self.len {
            return corrupt(format!("size {} but {} linked items", self.len, count));
        }
        Ok(())
    }

    /// Last resident `e` with `key` not sorting before `e`.
    fn locate(&self, key: &T) -> Option<u32> {
        let tail = self.tail?;
        if key.placement(self.item(tail)?) == Placement::After {
            self.hint.set(Some(tail));
            return Some(tail);
        }

        let start = self.hint.get().or(self.head)?;
        let found = if key.placement(self.item(start)?) == Placement::After {
            let mut prev = None;
            let mut cur = Some(start);
            while let Some(c) = cur {
                if key.placement(self.item(c)?) == Placement::Before {
                    break;
                }
                prev = Some(c);
                cur = self.slots[c as usize].next;
            }
            prev
        } else {
            let mut cur = Some(start);
            while let Some(c) = cur {
                if key.placement(self.item(c)?) != Placement::Before {
                    break;
                }
                cur = self.slots[c as usize].prev;
            }
            cur
        };

        self.hint.set(found);
        found
    }
}

impl<T: fmt::Debug> fmt::Debug for PositionIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(_, item)| item)).finish()
    }
}

// ── Iterators ────────────────────────────────────────────────────────────────

pub struct Iter<'a, T> {
    index:     &'a PositionIndex<T>,
    cur:       Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.cur?;
        let slot = &self.index.slots[c as usize];
        self.cur = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((self.index.id(c), slot.item.as_ref()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub struct IterRev<'a, T> {
    index:     &'a PositionIndex<T>,
    cur:       Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for IterRev<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.cur?;
        let slot = &self.index.slots[c as usize];
        self.cur = slot.prev;
        self.remaining = self.remaining.saturating_sub(1);
        Some((self.index.id(c), slot.item.as_ref()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
