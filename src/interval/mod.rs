//! Filepath: src/interval/mod.rs
//!
//! One contract over structurally different interval-map libraries.
//!
//! The benchmark matrix only ever talks to [`IntervalMap`]. Each adapter
//! owns exactly one underlying map and translates three operations:
//!
//! - [`IntervalMap::insert`]: map the half-open interval `[low, high)` to a value
//! - [`IntervalMap::lookup`]: value of the interval containing a key
//! - [`IntervalMap::intervals`]: stored `(start, stop, value)` in ascending order
//!
//! | Adapter | Library | Native shape |
//! |---------|---------|--------------|
//! | [`TreeIntervalMap`] | `bio::data_structures::interval_tree::IntervalTree` | augmented AVL multimap, queried by overlap |
//! | [`CoalescingIntervalMap`] | `rangemap::RangeMap` | union-style insert that overwrites and merges |
//!
//! # Overlap
//!
//! Adapters do not normalize overlapping inserts; each library keeps its
//! own behavior and the two disagree:
//!
//! - `CoalescingIntervalMap` overwrites the overlapped part of older
//!   intervals and merges touching intervals that carry equal values.
//! - `TreeIntervalMap` keeps every inserted interval, overlapping and
//!   duplicate ones included, and answers a lookup with the innermost
//!   interval containing the key: greatest start, then smallest stop.
//!
//! Benchmarks place interval `i` at `[i * INTERVAL_STRIDE, i * INTERVAL_STRIDE + INTERVAL_WIDTH)`,
//! which never overlaps or touches, so both libraries store the same data.

mod coalescing;
mod tree;

pub use coalescing::CoalescingIntervalMap;
pub use tree::TreeIntervalMap;

/// Distance between the starts of consecutive benchmark intervals.
pub const INTERVAL_STRIDE: i64 = 37;

/// Length of every benchmark interval.
pub const INTERVAL_WIDTH: i64 = 31;

// A gap between intervals keeps them from overlapping or coalescing.
const _: () = assert!(INTERVAL_STRIDE > INTERVAL_WIDTH && INTERVAL_WIDTH > 0);

/// A stored interval and its value, as produced by [`IntervalMap::intervals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalEntry<V> {
    /// Inclusive start.
    pub start: i64,
    /// Exclusive stop.
    pub stop: i64,
    /// Mapped value.
    pub value: V,
}

/// The three-operation contract every interval-map adapter satisfies.
///
/// An adapter starts empty, becomes populated by `insert`, and has no
/// removal operation.
pub trait IntervalMap<V>: Default {
    /// Name used in benchmark ids and reports.
    const NAME: &'static str;

    /// Map `[low, high)` to `value`. Overlap handling is the library's own.
    ///
    /// # Panics
    ///
    /// Panics if `low >= high`.
    fn insert(&mut self, low: i64, high: i64, value: V);

    /// Value of the interval containing `key`.
    ///
    /// # Panics
    ///
    /// Panics if no stored interval contains `key`. Callers must only
    /// query covered keys.
    fn lookup(&self, key: i64) -> V;

    /// Stored intervals in ascending key order. Single pass.
    fn intervals(&self) -> impl Iterator<Item = IntervalEntry<V>> + '_;

    /// Number of stored intervals.
    fn len(&self) -> usize;

    /// `true` if nothing has been inserted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusive start of benchmark interval `index`.
#[inline(always)]
#[must_use]
pub fn interval_start(index: usize) -> i64 {
    let index = i64::try_from(index).unwrap_or_else(|_| panic!("interval index {index} exceeds i64"));
    index * INTERVAL_STRIDE
}

/// A key covered by benchmark interval `index` (never its gap).
///
/// The offset inside the interval varies with the index so lookups do not
/// all hit interval starts.
#[inline(always)]
#[must_use]
pub fn covered_key(index: usize) -> i64 {
    let start = interval_start(index);
    start + start % INTERVAL_WIDTH
}

/// Build an adapter holding every interval of `source`, inserted in order.
///
/// Used to derive equivalent fixtures across libraries from one population.
pub fn transplant<V, S, D>(source: &S) -> D
where
    S: IntervalMap<V>,
    D: IntervalMap<V>,
{
    let mut dest = D::default();
    for entry in source.intervals() {
        dest.insert(entry.start, entry.stop, entry.value);
    }
    dest
}

/// Panic unless `[low, high)` is non-empty. Shared by the adapters.
#[inline(always)]
#[track_caller]
fn check_bounds(low: i64, high: i64) {
    assert!(low < high, "interval [{low}, {high}) is empty or reversed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Size16, Synthetic};

    fn populate<M: IntervalMap<Size16>>(count: usize) -> M {
        let mut map = M::default();
        for i in 0..count {
            let low = interval_start(i);
            map.insert(low, low + INTERVAL_WIDTH, Size16::synthesize(i as u32));
        }
        map
    }

    #[test]
    fn covered_keys_stay_inside() {
        for i in 0..10_000 {
            let key = covered_key(i);
            let start = interval_start(i);
            assert!(key >= start && key < start + INTERVAL_WIDTH, "index {i}");
        }
    }

    #[test]
    fn transplant_tree_to_coalescing() {
        let source: TreeIntervalMap<Size16> = populate(100);
        let dest: CoalescingIntervalMap<Size16> = transplant(&source);

        assert_eq!(dest.len(), 100);
        for i in 0..100 {
            assert_eq!(dest.lookup(covered_key(i)), source.lookup(covered_key(i)));
        }
    }

    #[test]
    fn transplant_coalescing_to_tree() {
        let source: CoalescingIntervalMap<Size16> = populate(50);
        let dest: TreeIntervalMap<Size16> = transplant(&source);

        let a: Vec<_> = source.intervals().collect();
        let b: Vec<_> = dest.intervals().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn the_three_interval_example() {
        fn check<M: IntervalMap<i64>>() {
            let mut map = M::default();
            map.insert(0, 31, 100);
            map.insert(37, 68, 101);
            map.insert(74, 105, 102);
            assert_eq!(map.lookup(40), 101, "{}", M::NAME);
        }
        check::<TreeIntervalMap<i64>>();
        check::<CoalescingIntervalMap<i64>>();
    }
}
