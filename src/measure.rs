//! Filepath: src/measure.rs
//!
//! The boundary between fixture construction and the timed region.
//!
//! Case bodies build everything they need first and then hand exactly one
//! routine to [`Measure::measure`]. Whatever drives the timing (criterion in
//! `benches/matrix.rs`, [`SingleShot`] in the smoke driver and tests) only
//! ever sees that routine.

use std::hint::black_box;
use std::sync::atomic::{Ordering, compiler_fence};
use std::time::{Duration, Instant};

/// A timing runner that repeatedly executes a routine.
pub trait Measure {
    /// Time `routine`, calling it as many times as the runner wants.
    fn measure<O, R>(&mut self, routine: R)
    where
        R: FnMut() -> O;
}

/// Keep the compiler from moving memory operations across a timing
/// boundary.
///
/// This is a compiler fence only. It does not make earlier stores
/// observable, so it cannot stop dead writes or unused results from being
/// optimized out. Case bodies keep their work alive by passing results to
/// [`black_box`] or returning them from the measured routine.
#[inline(always)]
pub fn clobber_memory() {
    compiler_fence(Ordering::SeqCst);
}

/// Runs the routine a fixed number of times and records wall time.
#[derive(Clone, Debug)]
pub struct SingleShot {
    iterations: usize,
    calls: usize,
    elapsed: Duration,
}

impl Default for SingleShot {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SingleShot {
    /// Runner calling each routine `iterations` times.
    #[must_use]
    pub const fn new(iterations: usize) -> Self {
        Self {
            iterations,
            calls: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// How many routines have been measured.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }

    /// Total time spent inside measured routines.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Measure for SingleShot {
    fn measure<O, R>(&mut self, mut routine: R)
    where
        R: FnMut() -> O,
    {
        let start = Instant::now();
        for _ in 0..self.iterations {
            black_box(routine());
        }
        self.elapsed += start.elapsed();
        self.calls += 1;
    }
}
