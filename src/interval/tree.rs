//! Filepath: src/interval/tree.rs
//!
//! Interval map over `bio`'s augmented AVL interval tree.
//!
//! The tree is a multimap: every insert adds a node, overlapping and
//! duplicate intervals included, and a query walks all nodes whose interval
//! overlaps it. Its native interface is a query iterator, not a point
//! lookup, so the adapter narrows a point query to one answer: the
//! containing interval with the greatest start, ties going to the shorter
//! interval.

use bio::data_structures::interval_tree::{Entry, IntervalTree};

use super::{IntervalEntry, IntervalMap, check_bounds};

/// `bio::data_structures::interval_tree::IntervalTree` adapter.
#[derive(Clone, Debug)]
pub struct TreeIntervalMap<V> {
    tree: IntervalTree<i64, V>,
    len: usize,
}

impl<V> Default for TreeIntervalMap<V> {
    fn default() -> Self {
        Self {
            tree: IntervalTree::new(),
            len: 0,
        }
    }
}

impl<V> TreeIntervalMap<V> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the innermost interval containing `key`, or `None` when
    /// `key` falls in a gap.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&V> {
        // Nothing covers i64::MAX: stops are exclusive.
        let next = key.checked_add(1)?;
        self.tree
            .find(key..next)
            .max_by(|a, b| innermost_first(a, b))
            .map(|entry| entry.data())
    }
}

/// Order entries so the one with the greatest start, then the smallest
/// stop, compares greatest.
fn innermost_first<V>(a: &Entry<'_, i64, V>, b: &Entry<'_, i64, V>) -> std::cmp::Ordering {
    let (a, b) = (a.interval(), b.interval());
    a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end))
}

impl<V: Clone> IntervalMap<V> for TreeIntervalMap<V> {
    const NAME: &'static str = "interval_tree";

    #[inline]
    fn insert(&mut self, low: i64, high: i64, value: V) {
        check_bounds(low, high);
        self.tree.insert(low..high, value);
        self.len += 1;
    }

    #[inline]
    fn lookup(&self, key: i64) -> V {
        match self.get(key) {
            Some(value) => value.clone(),
            None => panic!("{}: key {key} is not covered by any interval", Self::NAME),
        }
    }

    /// The tree reports overlaps in node order, so entries are gathered and
    /// sorted by (start, stop).
    fn intervals(&self) -> impl Iterator<Item = IntervalEntry<V>> + '_ {
        let mut entries: Vec<IntervalEntry<V>> = self
            .tree
            .find(i64::MIN..i64::MAX)
            .map(|entry| IntervalEntry {
                start: entry.interval().start,
                stop: entry.interval().end,
                value: entry.data().clone(),
            })
            .collect();
        entries.sort_by_key(|e| (e.start, e.stop));
        entries.into_iter()
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let map = TreeIntervalMap::<i32>::new();
        assert!(map.is_empty());
        assert_eq!(map.intervals().count(), 0);
        assert_eq!(map.get(0), None);
        assert_eq!(map.get(i64::MAX), None);
    }

    #[test]
    fn half_open_bounds() {
        let mut map = TreeIntervalMap::new();
        map.insert(10, 20, 'a');

        assert_eq!(map.get(9), None);
        assert_eq!(map.get(10), Some(&'a'));
        assert_eq!(map.get(19), Some(&'a'));
        assert_eq!(map.get(20), None);
    }

    #[test]
    #[should_panic(expected = "not covered")]
    fn lookup_in_gap_panics() {
        let mut map = TreeIntervalMap::new();
        map.insert(0, 31, 0);
        map.insert(37, 68, 1);
        let _ = map.lookup(33);
    }

    #[test]
    #[should_panic(expected = "empty or reversed")]
    fn rejects_reversed_bounds() {
        let mut map = TreeIntervalMap::new();
        map.insert(5, 5, 0);
    }

    #[test]
    fn overlapping_inserts_are_all_kept() {
        let mut map = TreeIntervalMap::new();
        map.insert(0, 100, 'a');
        map.insert(50, 60, 'b');

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(55), Some(&'b'));
        assert_eq!(map.get(70), Some(&'a'));
        assert_eq!(map.lookup(70), 'a');
    }

    #[test]
    fn lookup_agrees_with_stored_intervals() {
        let mut map = TreeIntervalMap::new();
        map.insert(0, 100, 'a');
        map.insert(50, 60, 'b');
        map.insert(90, 120, 'c');

        for entry in map.intervals() {
            for key in entry.start..entry.stop {
                assert!(map.get(key).is_some(), "key {key} inside {entry:?}");
            }
        }
    }

    #[test]
    fn same_start_prefers_shorter() {
        let mut map = TreeIntervalMap::new();
        map.insert(0, 10, 'a');
        map.insert(0, 5, 'b');

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(3), Some(&'b'));
        assert_eq!(map.get(7), Some(&'a'));
    }

    #[test]
    fn iterates_in_start_order() {
        let mut map = TreeIntervalMap::new();
        map.insert(74, 105, 2);
        map.insert(0, 31, 0);
        map.insert(37, 68, 1);

        let starts: Vec<i64> = map.intervals().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 37, 74]);
    }
}
