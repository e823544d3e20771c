//! # fairbench
//!
//! A benchmark harness comparing container implementations on identical,
//! deterministic workloads.
//!
//! Every measured case is a triple of operation, container and value shape,
//! run at each size of [`SIZE_LADDER`]. Fairness rests on three pieces:
//!
//! - [`value`]: values are a pure function of an index, so every container
//!   sees the same data.
//! - [`permutation`]: random access orders are seeded and cached per size,
//!   so every container sees the same order.
//! - [`matrix`]: fixtures are built before [`Measure::measure`] is called,
//!   so setup never lands in the timed region.
//!
//! [`interval`] adapts two interval-map implementations to one contract, and
//! [`containers`] gives the vector, map and set families the minimal traits
//! their benchmark bodies need.
//!
//! ## Running
//!
//! ```bash
//! # Full matrix under criterion
//! cargo bench --bench matrix
//!
//! # Restrict sizes
//! FAIRBENCH_MIN_ELEMENTS=64 FAIRBENCH_MAX_ELEMENTS=1024 cargo bench --bench matrix
//!
//! # Markdown summary of the last run
//! cargo run --bin bench_report -- --dir target/criterion
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fairbench::{PermutationCache, SingleShot, cases};
//!
//! let cache = PermutationCache::new();
//! let mut runner = SingleShot::default();
//! for case in cases().take(3) {
//!     case.run(8, &cache, &mut runner);
//! }
//! assert_eq!(runner.calls(), 3);
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Hot-path helpers are measured with and without inlining.
#![allow(clippy::inline_always)]

pub mod config;
pub mod containers;
pub mod interval;
pub mod matrix;
pub mod measure;
pub mod permutation;
pub mod report;
pub mod value;

mod tracing_helpers;

pub use config::{BenchConfig, ConfigError};
pub use interval::{CoalescingIntervalMap, IntervalMap, TreeIntervalMap};
pub use matrix::{Case, CaseGroup, Container, Operation, SIZE_LADDER, case_groups, cases};
pub use measure::{Measure, SingleShot};
pub use permutation::{Permutation, PermutationCache, PermutationSource};
pub use report::{BenchmarkResults, Measurement, ReportError};
pub use value::{Size16, Size64, Synthetic, ValueKind};

/// Install a console subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing without the `tracing` feature, or if a subscriber is
/// already installed.
pub fn init_tracing() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .compact()
            .try_init();
    }
}
