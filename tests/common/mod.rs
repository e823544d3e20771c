//! Shared test utilities: a test subscriber and recording doubles.
//!
//! `RUST_LOG` filters the subscriber (default `info`). Library events only
//! appear with the `tracing` feature enabled.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use fairbench::{Measure, Permutation, PermutationCache, PermutationSource};

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a compact console subscriber. Only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .compact()
            .try_init();
    });
}

// =============================================================================
// Recording runner and permutation source
// =============================================================================

/// What a case did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A permutation of this size was requested.
    Permutation(usize),
    /// A routine was handed to the runner.
    Measure,
}

/// Shared event log for one case run.
pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Runner that logs each routine it receives and calls it `iterations` times.
#[derive(Debug)]
pub struct RecordingRunner {
    log: EventLog,
    iterations: usize,
}

impl RecordingRunner {
    pub fn new(log: EventLog, iterations: usize) -> Self {
        Self { log, iterations }
    }
}

impl Measure for RecordingRunner {
    fn measure<O, R>(&mut self, mut routine: R)
    where
        R: FnMut() -> O,
    {
        self.log.borrow_mut().push(Event::Measure);
        for _ in 0..self.iterations {
            std::hint::black_box(routine());
        }
    }
}

/// Permutation source that logs requests before delegating to a cache.
#[derive(Debug)]
pub struct RecordingSource {
    log: EventLog,
    cache: PermutationCache,
}

impl RecordingSource {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            cache: PermutationCache::new(),
        }
    }

    pub fn cache(&self) -> &PermutationCache {
        &self.cache
    }
}

impl PermutationSource for RecordingSource {
    fn permutation_for(&self, size: usize) -> Permutation {
        self.log.borrow_mut().push(Event::Permutation(size));
        self.cache.permutation_for(size)
    }
}

/// A fresh event log with a runner and source writing to it.
pub fn recorder(iterations: usize) -> (EventLog, RecordingRunner, RecordingSource) {
    let log = EventLog::default();
    let runner = RecordingRunner::new(Rc::clone(&log), iterations);
    let source = RecordingSource::new(Rc::clone(&log));
    (log, runner, source)
}
