//! Unit tests for the ordered index.

/// Closed integer interval, sorted ascending.  Touching intervals overlap.
#[cfg(test)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Span {
    lo: i64,
    hi: i64,
}

#[cfg(test)]
impl Span {
    fn new(lo: i64, len: i64) -> Self {
        Span { lo, hi: lo + len }
    }
}

#[cfg(test)]
impl crate::Ordered for Span {
    fn placement(&self, other: &Self) -> crate::Placement {
        if self.hi < other.lo {
            crate::Placement::Before
        } else if self.lo > other.hi {
            crate::Placement::After
        } else {
            crate::Placement::Overlaps
        }
    }
}

#[cfg(test)]
mod insert {
    use super::Span;
    use crate::{IndexError, PositionIndex};

    fn los(idx: &PositionIndex<Span>) -> Vec<i64> {
        idx.iter().map(|(_, s)| s.lo).collect()
    }

    #[test]
    fn keeps_order_regardless_of_insert_order() {
        let mut idx = PositionIndex::new();
        for lo in [50, 10, 90, 30, 70] {
            idx.insert(Span::new(lo, 5)).unwrap();
        }
        assert_eq!(los(&idx), vec![10, 30, 50, 70, 90]);
        assert_eq!(idx.len(), 5);
        idx.verify().unwrap();
    }

    #[test]
    fn collision_leaves_index_unchanged() {
        let mut idx = PositionIndex::new();
        idx.insert(Span::new(0, 10)).unwrap();
        idx.insert(Span::new(20, 10)).unwrap();
        let before = los(&idx);

        // Touches the first span's end point.
        assert_eq!(idx.insert(Span::new(10, 5)), Err(IndexError::Collision));
        // Straddles the gap into the second span.
        assert_eq!(idx.insert(Span::new(15, 5)), Err(IndexError::Collision));
        assert_eq!(idx.insert_if_possible(Span::new(25, 1)), None);

        assert_eq!(idx.len(), 2);
        assert_eq!(los(&idx), before);
        idx.verify().unwrap();

        assert!(idx.insert_if_possible(Span::new(12, 5)).is_some());
        assert_eq!(los(&idx), vec![0, 12, 20]);
    }

    #[test]
    fn head_tail_and_links() {
        let mut idx = PositionIndex::new();
        let b = idx.insert(Span::new(20, 1)).unwrap();
        let a = idx.insert(Span::new(0, 1)).unwrap();
        let c = idx.insert(Span::new(40, 1)).unwrap();
        assert_eq!(idx.head(), Some(a));
        assert_eq!(idx.tail(), Some(c));
        assert_eq!(idx.next(a), Some(b));
        assert_eq!(idx.prev(c), Some(b));
        assert_eq!(idx.prev(a), None);
        assert_eq!(idx.next(c), None);
    }

    #[test]
    fn reposition_respects_neighbors() {
        let mut idx = PositionIndex::new();
        idx.insert(Span::new(0, 5)).unwrap();
        let mid = idx.insert(Span::new(20, 5)).unwrap();
        idx.insert(Span::new(40, 5)).unwrap();

        idx.reposition(mid, Span::new(30, 5)).unwrap();
        assert_eq!(idx.get(mid), Some(&Span::new(30, 5)));

        assert_eq!(idx.reposition(mid, Span::new(38, 5)), Err(IndexError::OutOfOrder));
        assert_eq!(idx.reposition(mid, Span::new(-10, 5)), Err(IndexError::OutOfOrder));
        assert_eq!(idx.get(mid), Some(&Span::new(30, 5)));
        idx.verify().unwrap();
    }
}

#[cfg(test)]
mod remove {
    use super::Span;
    use crate::{IndexError, PositionIndex};

    #[test]
    fn stale_handle_never_aliases() {
        let mut idx = PositionIndex::new();
        let a = idx.insert(Span::new(0, 5)).unwrap();
        assert_eq!(idx.remove(a), Some(Span::new(0, 5)));
        assert_eq!(idx.remove(a), None);

        // Reuses the freed slot.
        let b = idx.insert(Span::new(100, 5)).unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert_eq!(idx.get(a), None);
        assert!(!idx.contains(a));
        assert_eq!(idx.reposition(a, Span::new(0, 1)), Err(IndexError::StaleSlot));
        assert_eq!(idx.get(b), Some(&Span::new(100, 5)));
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut idx = PositionIndex::new();
        let ids: Vec<_> = (0..5).map(|i| idx.insert(Span::new(i * 10, 2)).unwrap()).collect();

        idx.remove(ids[0]).unwrap();
        idx.remove(ids[2]).unwrap();
        idx.remove(ids[4]).unwrap();
        idx.verify().unwrap();
        assert_eq!(idx.head(), Some(ids[1]));
        assert_eq!(idx.tail(), Some(ids[3]));
        assert_eq!(idx.next(ids[1]), Some(ids[3]));

        idx.remove(ids[1]).unwrap();
        idx.remove(ids[3]).unwrap();
        assert!(idx.is_empty());
        assert_eq!(idx.head(), None);
        assert_eq!(idx.tail(), None);
        idx.verify().unwrap();
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut idx = PositionIndex::new();
        let a = idx.insert(Span::new(0, 5)).unwrap();
        idx.insert(Span::new(10, 5)).unwrap();
        idx.clear();
        assert!(idx.is_empty());
        assert_eq!(idx.get(a), None);
        idx.verify().unwrap();
        idx.insert(Span::new(0, 5)).unwrap();
        assert_eq!(idx.len(), 1);
    }
}

#[cfg(test)]
mod find {
    use super::Span;
    use crate::PositionIndex;

    fn sample() -> (PositionIndex<Span>, Vec<crate::SlotId>) {
        let mut idx = PositionIndex::new();
        let ids = [0, 20, 40]
            .into_iter()
            .map(|lo| idx.insert(Span::new(lo, 5)).unwrap())
            .collect();
        (idx, ids)
    }

    #[test]
    fn at_or_before() {
        let (idx, ids) = sample();
        assert_eq!(idx.find_at_or_before(&Span::new(-10, 2)), None);
        assert_eq!(idx.find_at_or_before(&Span::new(10, 2)), Some(ids[0]));
        assert_eq!(idx.find_at_or_before(&Span::new(22, 1)), Some(ids[1]));
        assert_eq!(idx.find_at_or_before(&Span::new(100, 1)), Some(ids[2]));
        // Walks backwards from a hint that is past the key.
        assert_eq!(idx.find_at_or_before(&Span::new(8, 1)), Some(ids[0]));
    }

    #[test]
    fn at_or_after() {
        let (idx, ids) = sample();
        assert_eq!(idx.find_at_or_after(&Span::new(-10, 2)), Some(ids[0]));
        assert_eq!(idx.find_at_or_after(&Span::new(10, 2)), Some(ids[1]));
        assert_eq!(idx.find_at_or_after(&Span::new(22, 1)), Some(ids[1]));
        assert_eq!(idx.find_at_or_after(&Span::new(100, 1)), None);
        // Overlaps two residents: the first one wins.
        assert_eq!(idx.find_at_or_after(&Span::new(3, 20)), Some(ids[0]));
    }

    #[test]
    fn iterators_are_restartable() {
        let (idx, _) = sample();
        let fwd: Vec<i64> = idx.iter().map(|(_, s)| s.lo).collect();
        let again: Vec<i64> = idx.iter().map(|(_, s)| s.lo).collect();
        let mut rev: Vec<i64> = idx.iter_rev().map(|(_, s)| s.lo).collect();
        assert_eq!(fwd, again);
        rev.reverse();
        assert_eq!(fwd, rev);
        assert_eq!(idx.iter().size_hint(), (3, Some(3)));
    }
}

#[cfg(test)]
mod randomized {
    use std::collections::BTreeMap;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::Span;
    use crate::{PositionIndex, SlotId};

    #[test]
    fn random_insert_delete_matches_model() {
        for seed in 0..8u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut idx = PositionIndex::new();
            let mut model: BTreeMap<i64, (Span, SlotId)> = BTreeMap::new();

            for _ in 0..2_000 {
                if model.is_empty() || rng.gen_bool(0.6) {
                    let span = Span::new(rng.gen_range(0..5_000), rng.gen_range(0..20));
                    let clash = model
                        .values()
                        .any(|(s, _)| !(span.hi < s.lo || span.lo > s.hi));
                    match idx.insert(span) {
                        Ok(id) => {
                            assert!(!clash, "accepted an overlapping span {span:?}");
                            model.insert(span.lo, (span, id));
                        }
                        Err(_) => assert!(clash, "refused a free span {span:?}"),
                    }
                } else {
                    let pick = rng.gen_range(0..model.len());
                    let key = *model.keys().nth(pick).unwrap();
                    let (span, id) = model.remove(&key).unwrap();
                    assert_eq!(idx.remove(id), Some(span));
                }

                assert_eq!(idx.len(), model.len());
                idx.verify().unwrap();
            }

            let got: Vec<Span> = idx.iter().map(|(_, s)| *s).collect();
            let want: Vec<Span> = model.values().map(|(s, _)| *s).collect();
            assert_eq!(got, want);
        }
    }
}
