//! Zero-cost tracing helpers.
//!
//! With the `tracing` feature these macros forward to the `tracing` crate.
//! Without it (the default) they expand to nothing, so benchmark builds
//! carry no logging in or around the timed region.
//!
//! # Usage
//!
//! ```bash
//! # Benchmarks: no tracing overhead
//! cargo bench --bench matrix
//!
//! # Smoke run with fixture and cache events
//! RUST_LOG=fairbench=debug cargo run --features tracing
//!
//! # One module at trace level
//! RUST_LOG=fairbench::permutation=trace cargo test --features tracing
//! ```
//!
//! Nothing inside a [`Measure::measure`](crate::Measure::measure) routine may
//! log. Events belong to fixture construction and cache bookkeeping.

#![allow(unused_macros, unused_imports)]

/// Trace-level logging (most verbose). Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        // Completely empty - zero cost
    };
}

/// Debug-level logging. Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Warn-level logging. Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

// Export macros for use within crate
pub(crate) use debug_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
