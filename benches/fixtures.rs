//! Fixture construction cost, using divan.
//!
//! Not part of any comparison. Shows how much setup each case pays outside
//! its timed region.
//!
//! Run with: `cargo bench --bench fixtures`

use divan::{Bencher, black_box};
use fairbench::permutation::{PermutationCache, shuffled_indices};
use fairbench::value::{Size16, Size64, synthesize_n};

fn main() {
    divan::main();
}

// =============================================================================
// Value generation
// =============================================================================

mod synthesize {
    use super::{Size16, Size64, black_box, synthesize_n};

    #[divan::bench(types = [i32, i64, Size16, Size64], args = [64, 1024, 16384])]
    fn sequence<T: fairbench::Synthetic>(n: usize) -> Vec<T> {
        synthesize_n::<T>(black_box(n))
    }
}

// =============================================================================
// Permutations
// =============================================================================

mod permutation {
    use super::{Bencher, PermutationCache, black_box, shuffled_indices};

    /// First request for a size: shuffle and insert.
    #[divan::bench(args = [64, 1024, 16384])]
    fn cold(bencher: Bencher<'_, '_>, n: usize) {
        bencher
            .with_inputs(PermutationCache::new)
            .bench_local_values(|cache| black_box(cache.permutation_for(n)));
    }

    /// Every later request: lock and clone an `Arc`.
    #[divan::bench(args = [64, 1024, 16384])]
    fn hit(bencher: Bencher<'_, '_>, n: usize) {
        let cache = PermutationCache::new();
        let _ = cache.permutation_for(n);
        bencher.bench_local(|| black_box(cache.permutation_for(black_box(n))));
    }

    /// The shuffle alone.
    #[divan::bench(args = [64, 1024, 16384])]
    fn shuffle(n: usize) -> Vec<usize> {
        shuffled_indices(black_box(n), 0)
    }
}
