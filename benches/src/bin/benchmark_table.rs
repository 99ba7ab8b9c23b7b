//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package chronarc-bench --bin benchmark_table --release`

use chronarc_bench::{BenchmarkResult, Fixture, format_bytes, format_duration, run_pack};
use chronarc_lib::PackConfig;
use std::io::Write;
use std::time::Duration;

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: usize = 3;

const CONCURRENCY: [usize; 5] = [1, 2, 4, 8, 16];

#[tokio::main]
async fn main() {
    println!("chronarc packaging benchmark");
    println!("============================\n");

    let fixture = match Fixture::generate(500, 64 * 1024) {
        Ok(fixture) => fixture,
        Err(e) => {
            eprintln!("Error: failed to generate fixture: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "Fixture: {} entries, {}\n",
        fixture.entries().len(),
        format_bytes(fixture.total_bytes())
    );

    println!("Running benchmarks ({ITERATIONS} iterations each)...\n");

    let mut results: Vec<Vec<BenchmarkResult>> = Vec::new();
    for concurrency in CONCURRENCY {
        print!("Concurrency {concurrency}... ");
        let _ = std::io::stdout().flush();

        let mut runs = Vec::new();
        for i in 0..ITERATIONS {
            let config = PackConfig::default().with_concurrency(concurrency);
            runs.push(run_pack(&fixture, config, &format!("c{concurrency}-{i}")).await);
        }
        results.push(runs);
        println!("done");
    }

    println!("\n## Results\n");
    println!("| Concurrency | Time | Throughput | Entries/s | Archive |");
    println!("|-------------|------|------------|-----------|---------|");

    for runs in &results {
        let avg = average_results(runs);
        if avg.success {
            println!(
                "| {} | {} | {:.1} MB/s | {:.0} | {} |",
                avg.concurrency,
                format_duration(avg.duration),
                avg.throughput_mbps(),
                avg.entries_per_sec(),
                format_bytes(avg.archive_bytes),
            );
        } else {
            println!(
                "| {} | failed: {} | | | |",
                avg.concurrency,
                avg.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Average the successful runs; reports the first failure if none succeeded.
fn average_results(runs: &[BenchmarkResult]) -> BenchmarkResult {
    let ok: Vec<&BenchmarkResult> = runs.iter().filter(|r| r.success).collect();
    let Some(first) = ok.first() else {
        return runs[0].clone();
    };

    let n = ok.len() as u32;
    let total: Duration = ok.iter().map(|r| r.duration).sum();

    BenchmarkResult {
        duration: total / n,
        ..(*first).clone()
    }
}
