//! Smoke driver: run every registered case once per configured size.
//!
//! Catches broken fixtures without waiting for criterion. Timings printed
//! here are single-shot and not comparable between containers.
//!
//! Run with:
//! ```bash
//! FAIRBENCH_MAX_ELEMENTS=256 cargo run --release
//! RUST_LOG=fairbench=debug cargo run --features tracing
//! ```

use std::process::ExitCode;
use std::time::Instant;

use fairbench::{BenchConfig, PermutationCache, SingleShot, cases};

fn main() -> ExitCode {
    fairbench::init_tracing();

    let config = match BenchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sizes = config.sizes();
    if sizes.is_empty() {
        eprintln!(
            "No ladder size lies within [{}, {}]",
            config.min_elements, config.max_elements
        );
        return ExitCode::FAILURE;
    }

    let cache = PermutationCache::global();
    let started = Instant::now();
    let mut runs = 0usize;

    for case in cases() {
        for &n in &sizes {
            let mut shot = SingleShot::default();
            case.run(n, cache, &mut shot);
            let elapsed = format!("{:?}", shot.elapsed());
            println!("{:<50} {n:>6} {elapsed:>12}", case.to_string());
            runs += 1;
        }
    }

    eprintln!(
        "{runs} runs over {} sizes in {:.2?} ({} cached permutations)",
        sizes.len(),
        started.elapsed(),
        cache.len()
    );
    ExitCode::SUCCESS
}
