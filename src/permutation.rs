//! Filepath: src/permutation.rs
//!
//! Shared random access orderings.
//!
//! A random-read benchmark visits elements in a shuffled order. If every
//! container drew its own shuffle, one of them could get a lucky ordering
//! and another an unlucky one. [`PermutationCache`] hands out one fixed
//! permutation per size instead: the first request for size `N` shuffles
//! `0..N` with a fixed-seed generator and every later request, from any
//! container, gets that same sequence back.
//!
//! The shuffle is a Fisher-Yates pass driven by [`ChaCha8Rng`] seeded with
//! [`PermutationCache::DEFAULT_SEED`], so the orderings are identical
//! across processes.
//!
//! # Thread Safety
//!
//! The cache is `Sync`. A single mutex guards lookup and fill, so each size
//! is computed at most once and readers only ever see complete sequences.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::tracing_helpers::{debug_log, trace_log};

/// A shared, immutable access order.
pub type Permutation = Arc<[usize]>;

// ============================================================================
//  PermutationSource
// ============================================================================

/// Where benchmark fixtures get their random access orders from.
///
/// Fixtures depend on this trait rather than on the global cache so tests
/// can substitute a pre-seeded or instrumented source.
pub trait PermutationSource {
    /// A permutation of `0..size`. Repeated calls with the same `size`
    /// return the same sequence.
    fn permutation_for(&self, size: usize) -> Permutation;
}

impl<P: PermutationSource + ?Sized> PermutationSource for &P {
    #[inline]
    fn permutation_for(&self, size: usize) -> Permutation {
        (**self).permutation_for(size)
    }
}

// ============================================================================
//  PermutationCache
// ============================================================================

/// Lazily filled map from size to permutation. Entries are never evicted.
#[derive(Debug)]
pub struct PermutationCache {
    seed: u64,
    entries: Mutex<HashMap<usize, Permutation>>,
}

impl Default for PermutationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PermutationCache {
    /// Seed used by [`PermutationCache::new`] and the process-wide cache.
    pub const DEFAULT_SEED: u64 = 0;

    /// Empty cache using [`Self::DEFAULT_SEED`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Empty cache shuffling with a different seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide cache shared by every benchmark case.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<PermutationCache> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Seed this cache shuffles with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the permutation for `size`, computing it on first request.
    ///
    /// `size == 0` yields an empty sequence.
    pub fn permutation_for(&self, size: usize) -> Permutation {
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.get(&size) {
            trace_log!(size, "permutation cache hit");
            return Arc::clone(existing);
        }

        let fresh: Permutation = shuffled_indices(size, self.seed).into();
        debug_log!(size, seed = self.seed, "permutation computed");
        entries.insert(size, Arc::clone(&fresh));
        fresh
    }

    /// Install `order` as the permutation for its length.
    ///
    /// Returns `false` (and leaves the cache unchanged) if that size is
    /// already cached: a permutation, once observed, never changes.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..order.len()`.
    pub fn preseed(&self, order: Vec<usize>) -> bool {
        assert!(
            is_permutation(&order),
            "preseeded order is not a permutation of 0..{}",
            order.len()
        );

        let mut entries = self.entries.lock();
        let size = order.len();
        if entries.contains_key(&size) {
            return false;
        }
        entries.insert(size, order.into());
        true
    }

    /// Whether `size` has been computed or preseeded.
    #[must_use]
    pub fn is_cached(&self, size: usize) -> bool {
        self.entries.lock().contains_key(&size)
    }

    /// Cached sizes in ascending order.
    #[must_use]
    pub fn cached_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.entries.lock().keys().copied().collect();
        sizes.sort_unstable();
        sizes
    }

    /// Number of cached sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// `true` if nothing has been requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl PermutationSource for PermutationCache {
    #[inline]
    fn permutation_for(&self, size: usize) -> Permutation {
        Self::permutation_for(self, size)
    }
}

/// Identity sequence `0..size` shuffled with a generator seeded by `seed`.
#[must_use]
pub fn shuffled_indices(size: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..size).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// `true` if `order` holds each of `0..order.len()` exactly once.
#[must_use]
pub fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_four_is_stable() {
        let cache = PermutationCache::new();
        let first = cache.permutation_for(4);
        let second = cache.permutation_for(4);

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(is_permutation(&first));
    }

    #[test]
    fn zero_is_empty_and_idempotent() {
        let cache = PermutationCache::new();
        assert!(cache.permutation_for(0).is_empty());
        assert!(cache.permutation_for(0).is_empty());
        assert_eq!(cache.cached_sizes(), vec![0]);
    }

    #[test]
    fn independent_caches_agree() {
        let a = PermutationCache::new();
        let b = PermutationCache::new();
        assert_eq!(a.permutation_for(1024), b.permutation_for(1024));
        assert_eq!(*a.permutation_for(100), *shuffled_indices(100, 0));
    }

    /// Orders are pinned so a change to the RNG, its seeding or the shuffle
    /// shows up as a failure rather than as a silent shift in every result.
    #[test]
    fn default_orders_are_pinned() {
        let cache = PermutationCache::new();
        assert_eq!(&*cache.permutation_for(8), &[1, 4, 0, 2, 6, 3, 7, 5]);
        assert_eq!(
            &*cache.permutation_for(16),
            &[1, 9, 7, 3, 2, 13, 8, 4, 5, 0, 11, 12, 6, 14, 15, 10]
        );

        let order = cache.permutation_for(1024);
        assert_eq!(&order[..8], &[582, 381, 789, 854, 925, 484, 683, 150]);
        let weighted: usize = order.iter().enumerate().map(|(i, &v)| i * v).sum();
        assert_eq!(weighted, 271_878_182);
    }

    #[test]
    fn larger_sizes_are_shuffled() {
        let cache = PermutationCache::new();
        let order = cache.permutation_for(256);
        let identity: Vec<usize> = (0..256).collect();
        assert_ne!(&*order, identity.as_slice());
    }

    #[test]
    fn seed_changes_order() {
        let zero = PermutationCache::with_seed(0).permutation_for(64);
        let one = PermutationCache::with_seed(1).permutation_for(64);
        assert_ne!(zero, one);
    }

    #[test]
    fn preseed_wins_until_computed() {
        let cache = PermutationCache::new();
        assert!(cache.preseed(vec![2, 0, 1]));
        assert_eq!(&*cache.permutation_for(3), &[2, 0, 1]);

        assert!(!cache.preseed(vec![0, 1, 2]));
        assert_eq!(&*cache.permutation_for(3), &[2, 0, 1]);
    }

    #[test]
    #[should_panic(expected = "not a permutation")]
    fn preseed_rejects_duplicates() {
        let cache = PermutationCache::new();
        cache.preseed(vec![0, 0, 1]);
    }

    #[test]
    fn is_permutation_rejects_out_of_range() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[1, 0]));
        assert!(!is_permutation(&[0, 2]));
        assert!(!is_permutation(&[1, 1]));
    }

    #[test]
    fn global_is_shared() {
        let a = PermutationCache::global().permutation_for(32);
        let b = PermutationCache::global().permutation_for(32);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
