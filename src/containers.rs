//! Filepath: src/containers.rs
//!
//! Capability traits over the containers being compared.
//!
//! Each family gets the smallest trait its benchmark bodies need, implemented
//! for the library types unmodified. Nothing here is a new container.
//!
//! | Family | Trait | Implementors |
//! |--------|-------|--------------|
//! | vector | [`Sequence`], [`GrowableSequence`] | `Vec`, `SmallVec<[T; N]>`, `Box<[T]>` (read only) |
//! | map | [`KeyedMap`] | `BTreeMap`, std `HashMap`, `hashbrown::HashMap`, `IndexMap` |
//! | set | [`ValueSet`] | `BTreeSet`, std `HashSet`, `hashbrown::HashSet` |
//!
//! Interval maps have their own contract in [`crate::interval`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;
use smallvec::{Array, SmallVec};

/// Key type of every map case.
pub type MapKey = i64;

/// Inline capacities of the `SmallVec` variants under test.
pub type SmallVec8<T> = SmallVec<[T; 8]>;
/// See [`SmallVec8`].
pub type SmallVec16<T> = SmallVec<[T; 16]>;
/// See [`SmallVec8`].
pub type SmallVec1024<T> = SmallVec<[T; 1024]>;

// ============================================================================
//  Vector family
// ============================================================================

/// A contiguous sequence that can be built from values and read by index.
pub trait Sequence<T>: FromIterator<T> {
    /// The stored elements.
    fn as_slice(&self) -> &[T];
}

/// A [`Sequence`] that grows one element at a time.
pub trait GrowableSequence<T>: Sequence<T> {
    /// Empty sequence with room for `capacity` elements.
    fn with_capacity(capacity: usize) -> Self;

    /// Append `value`.
    fn push(&mut self, value: T);

    /// Start of the element buffer.
    fn as_ptr(&self) -> *const T;
}

impl<T> Sequence<T> for Vec<T> {
    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> GrowableSequence<T> for Vec<T> {
    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }

    #[inline(always)]
    fn push(&mut self, value: T) {
        self.push(value);
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }
}

impl<T, const N: usize> Sequence<T> for SmallVec<[T; N]>
where
    [T; N]: Array<Item = T>,
{
    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> GrowableSequence<T> for SmallVec<[T; N]>
where
    [T; N]: Array<Item = T>,
{
    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }

    #[inline(always)]
    fn push(&mut self, value: T) {
        self.push(value);
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }
}

impl<T> Sequence<T> for Box<[T]> {
    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }
}

// ============================================================================
//  Map family
// ============================================================================

/// A map from [`MapKey`] to values.
pub trait KeyedMap<V>: Default + FromIterator<(MapKey, V)> {
    /// Insert or overwrite `key`.
    fn put(&mut self, key: MapKey, value: V);

    /// Value stored at `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent. Lookup fixtures only query stored keys.
    fn fetch(&self, key: MapKey) -> &V;
}

impl<V> KeyedMap<V> for BTreeMap<MapKey, V> {
    #[inline(always)]
    fn put(&mut self, key: MapKey, value: V) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn fetch(&self, key: MapKey) -> &V {
        &self[&key]
    }
}

impl<V> KeyedMap<V> for HashMap<MapKey, V> {
    #[inline(always)]
    fn put(&mut self, key: MapKey, value: V) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn fetch(&self, key: MapKey) -> &V {
        &self[&key]
    }
}

impl<V> KeyedMap<V> for hashbrown::HashMap<MapKey, V> {
    #[inline(always)]
    fn put(&mut self, key: MapKey, value: V) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn fetch(&self, key: MapKey) -> &V {
        &self[&key]
    }
}

impl<V> KeyedMap<V> for IndexMap<MapKey, V> {
    #[inline(always)]
    fn put(&mut self, key: MapKey, value: V) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn fetch(&self, key: MapKey) -> &V {
        &self[&key]
    }
}

// ============================================================================
//  Set family
// ============================================================================

/// A set of values supporting insert and membership count.
pub trait ValueSet<T>: Default {
    /// Insert `value` (no-op if an equivalent value is present).
    fn put(&mut self, value: T);

    /// 1 if an equivalent value is present, else 0.
    fn count(&self, value: &T) -> usize;
}

impl<T: Ord> ValueSet<T> for BTreeSet<T> {
    #[inline(always)]
    fn put(&mut self, value: T) {
        self.insert(value);
    }

    #[inline(always)]
    fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }
}

impl<T: Hash + Eq> ValueSet<T> for HashSet<T> {
    #[inline(always)]
    fn put(&mut self, value: T) {
        self.insert(value);
    }

    #[inline(always)]
    fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }
}

impl<T: Hash + Eq> ValueSet<T> for hashbrown::HashSet<T> {
    #[inline(always)]
    fn put(&mut self, value: T) {
        self.insert(value);
    }

    #[inline(always)]
    fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Size64, Synthetic, synthesize_n};

    fn grow<S: GrowableSequence<i64>>(n: usize) -> S {
        let mut seq = S::with_capacity(n);
        for v in synthesize_n::<i64>(n) {
            seq.push(v);
        }
        seq
    }

    #[test]
    fn growable_sequences_agree() {
        let expected = synthesize_n::<i64>(40);
        assert_eq!(grow::<Vec<i64>>(40).as_slice(), expected.as_slice());
        assert_eq!(grow::<SmallVec8<i64>>(40).as_slice(), expected.as_slice());
        assert_eq!(grow::<SmallVec1024<i64>>(40).as_slice(), expected.as_slice());
    }

    #[test]
    fn boxed_slice_collects() {
        let boxed: Box<[Size64]> = synthesize_n::<Size64>(5).into_iter().collect();
        assert_eq!(boxed.as_slice()[4], Size64::synthesize(4));
    }

    fn round_trip<M: KeyedMap<i32>>() {
        let mut map = M::default();
        for k in 0..100 {
            map.put(k, i32::synthesize(k as u32));
        }
        for k in 0..100 {
            assert_eq!(*map.fetch(k), k as i32);
        }
    }

    #[test]
    fn maps_store_and_fetch() {
        round_trip::<BTreeMap<MapKey, i32>>();
        round_trip::<HashMap<MapKey, i32>>();
        round_trip::<hashbrown::HashMap<MapKey, i32>>();
        round_trip::<IndexMap<MapKey, i32>>();
    }

    #[test]
    #[should_panic]
    fn fetch_missing_key_panics() {
        let map: BTreeMap<MapKey, i32> = BTreeMap::new();
        let _ = map.fetch(1);
    }

    fn membership<S: ValueSet<Size64>>() {
        let mut set = S::default();
        for v in synthesize_n::<Size64>(20) {
            set.put(v);
        }
        assert_eq!(set.count(&Size64::synthesize(19)), 1);
        assert_eq!(set.count(&Size64::synthesize(20)), 0);
    }

    #[test]
    fn sets_count_members() {
        membership::<BTreeSet<Size64>>();
        membership::<HashSet<Size64>>();
        membership::<hashbrown::HashSet<Size64>>();
    }
}
