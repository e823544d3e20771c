//! Summarize a finished `cargo bench --bench matrix` run as markdown.
//!
//! Usage: `cargo run --release --bin bench_report -- [--dir target/criterion] [--out bench-report.md]`

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fairbench::report::{self, BenchmarkResults};

#[derive(Debug, Parser)]
#[command(name = "bench_report", about = "Render criterion results of the container matrix")]
struct Args {
    /// Criterion output directory.
    #[arg(long, default_value = "target/criterion")]
    dir: PathBuf,

    /// Drop results below this element count (0 keeps all).
    #[arg(long, default_value_t = 0)]
    min_elements: usize,

    /// Drop results above this element count (0 keeps all).
    #[arg(long, default_value_t = 0)]
    max_elements: usize,

    /// Where to write the markdown report.
    #[arg(long, default_value = "bench-report.md")]
    out: PathBuf,
}

fn main() -> ExitCode {
    fairbench::init_tracing();
    let args = Args::parse();

    if !args.dir.exists() {
        eprintln!("Directory not found: {}", args.dir.display());
        eprintln!("Run `cargo bench --bench matrix` first.");
        return ExitCode::FAILURE;
    }

    let measurements = match report::collect(&args.dir) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Collected {} measurements from {}",
        measurements.len(),
        args.dir.display()
    );

    let results =
        BenchmarkResults::from_measurements(measurements, args.min_elements, args.max_elements);
    if results.is_empty() {
        eprintln!("No measurements within the requested element bounds");
        return ExitCode::FAILURE;
    }

    let markdown = report::render_markdown(&results);
    if let Err(e) = fs::write(&args.out, markdown) {
        eprintln!("Failed to write {}: {e}", args.out.display());
        return ExitCode::FAILURE;
    }
    println!("Report written to: {}", args.out.display());
    ExitCode::SUCCESS
}
