//! Filepath: src/interval/coalescing.rs
//!
//! Interval map over `rangemap::RangeMap`.
//!
//! `RangeMap` treats insertion as a union: the new interval replaces
//! whatever it overlaps, and neighbours carrying an equal value are merged
//! into one stored range.

use std::ops::Range;

use rangemap::RangeMap;

use super::{IntervalEntry, IntervalMap, check_bounds};

/// `rangemap`-backed adapter.
#[derive(Clone, Debug)]
pub struct CoalescingIntervalMap<V> {
    map: RangeMap<i64, V>,
}

impl<V> Default for CoalescingIntervalMap<V> {
    fn default() -> Self {
        Self {
            map: RangeMap::new(),
        }
    }
}

impl<V> CoalescingIntervalMap<V> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `key`, or `None` when `key` falls in a gap.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&V> {
        self.map.get(&key)
    }
}

impl<V: Clone + PartialEq> IntervalMap<V> for CoalescingIntervalMap<V> {
    const NAME: &'static str = "range_map";

    #[inline]
    fn insert(&mut self, low: i64, high: i64, value: V) {
        check_bounds(low, high);
        self.map.insert(Range { start: low, end: high }, value);
    }

    #[inline]
    fn lookup(&self, key: i64) -> V {
        match self.map.get(&key) {
            Some(value) => value.clone(),
            None => panic!("{}: key {key} is not covered by any interval", Self::NAME),
        }
    }

    fn intervals(&self) -> impl Iterator<Item = IntervalEntry<V>> + '_ {
        self.map.iter().map(|(range, value)| IntervalEntry {
            start: range.start,
            stop: range.end,
            value: value.clone(),
        })
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
