//! Route relation bonuses
//!
//! [`RelationSignal`] turns a route relation's tags into a bonus.
//! [`RelationBonusStore`] keeps, per member way, the largest bonus seen so
//! far. Merging is a lock-free `fetch_max` once a way has a slot, so ways can
//! be fed from several import threads at once.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::tags::Tags;

/// Slot value meaning "no relation recorded yet".
const UNSET: i32 = i32::MIN;

/// Route relation scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSignal {
    pub prefer_bonus: i32,
    pub ferry_bonus: i32,
}

impl RelationSignal {
    pub fn new(prefer_bonus: i32, ferry_bonus: i32) -> Self {
        Self {
            prefer_bonus,
            ferry_bonus,
        }
    }

    pub fn score_relation(&self, tags: &dyn Tags) -> i32 {
        match tags.get("route") {
            Some("hiking" | "foot" | "bicycle" | "inline_skates") => self.prefer_bonus,
            Some("ferry") => self.ferry_bonus,
            _ => 0,
        }
    }
}

/// Monotone-max bonus per way, safe to update from many threads
#[derive(Debug, Default)]
pub struct RelationBonusStore {
    slots: RwLock<FxHashMap<i64, AtomicI32>>,
}

impl RelationBonusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `bonus` into the way's slot, keeping the larger value.
    /// Returns the value stored after the merge.
    pub fn merge(&self, way_id: i64, bonus: i32) -> i32 {
        {
            let slots = self.slots.read();
            if let Some(slot) = slots.get(&way_id) {
                return slot.fetch_max(bonus, Ordering::AcqRel).max(bonus);
            }
        }

        let mut slots = self.slots.write();
        let slot = slots.entry(way_id).or_insert_with(|| AtomicI32::new(UNSET));
        slot.fetch_max(bonus, Ordering::AcqRel).max(bonus)
    }

    /// Score a relation and merge its bonus into every member way.
    pub fn merge_relation(&self, signal: &RelationSignal, tags: &dyn Tags, member_ways: &[i64]) -> i32 {
        let bonus = signal.score_relation(tags);
        for &way_id in member_ways {
            self.merge(way_id, bonus);
        }
        bonus
    }

    /// Recorded bonus for a way, `None` when no relation touched it.
    pub fn get(&self, way_id: i64) -> Option<i32> {
        self.slots
            .read()
            .get(&way_id)
            .map(|slot| slot.load(Ordering::Acquire))
            .filter(|&v| v != UNSET)
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagBag;

    fn signal() -> RelationSignal {
        RelationSignal::new(5, -5)
    }

    #[test]
    fn test_score_relation() {
        let s = signal();
        for route in ["hiking", "foot", "bicycle", "inline_skates"] {
            assert_eq!(s.score_relation(&TagBag::new().with("route", route)), 5);
        }
        assert_eq!(s.score_relation(&TagBag::new().with("route", "ferry")), -5);
        assert_eq!(s.score_relation(&TagBag::new().with("route", "bus")), 0);
        assert_eq!(s.score_relation(&TagBag::new().with("type", "route")), 0);
    }

    #[test]
    fn test_merge_keeps_max_in_any_order() {
        let store = RelationBonusStore::new();
        store.merge(1, 5);
        store.merge(1, -5);
        assert_eq!(store.get(1), Some(5));

        store.merge(2, -5);
        store.merge(2, 5);
        assert_eq!(store.get(2), Some(5));
    }

    #[test]
    fn test_first_merge_records_negative() {
        let store = RelationBonusStore::new();
        assert_eq!(store.get(7), None);
        assert_eq!(store.merge(7, -5), -5);
        assert_eq!(store.get(7), Some(-5));
        assert_eq!(store.merge(7, 0), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_relation_members() {
        let store = RelationBonusStore::new();
        let hiking = TagBag::from_pairs(&[("type", "route"), ("route", "hiking")]);
        let ferry = TagBag::from_pairs(&[("type", "route"), ("route", "ferry")]);

        assert_eq!(store.merge_relation(&signal(), &ferry, &[10, 11]), -5);
        assert_eq!(store.merge_relation(&signal(), &hiking, &[11, 12]), 5);

        assert_eq!(store.get(10), Some(-5));
        assert_eq!(store.get(11), Some(5));
        assert_eq!(store.get(12), Some(5));
    }

    #[test]
    fn test_concurrent_merges() {
        let store = RelationBonusStore::new();
        std::thread::scope(|scope| {
            for t in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for way_id in 0..100 {
                        store.merge(way_id, if t % 2 == 0 { -5 } else { t });
                    }
                });
            }
        });

        for way_id in 0..100 {
            assert_eq!(store.get(way_id), Some(7));
        }
    }
}
