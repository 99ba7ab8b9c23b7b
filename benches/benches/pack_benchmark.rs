//! Packaging benchmarks across read concurrency levels.
//!
//! Run with: `cargo bench --package chronarc-bench`

use chronarc_bench::{Fixture, run_pack};
use chronarc_lib::PackConfig;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::time::Duration;

/// (label, entries, bytes per entry)
const FIXTURES: [(&str, usize, usize); 2] = [("200x16KB", 200, 16 * 1024), ("50x256KB", 50, 256 * 1024)];

const CONCURRENCY: [usize; 4] = [1, 4, 8, 32];

fn pack_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let mut group = c.benchmark_group("pack");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    for (label, count, size) in FIXTURES {
        let fixture = Fixture::generate(count, size).expect("fixture");
        group.throughput(Throughput::Bytes(fixture.total_bytes()));

        for concurrency in CONCURRENCY {
            let config = PackConfig::default().with_concurrency(concurrency);
            group.bench_with_input(
                BenchmarkId::new(label, concurrency),
                &config,
                |b, config| {
                    b.to_async(&runtime).iter(|| async {
                        let result = run_pack(&fixture, config.clone(), "bench").await;
                        assert!(result.success, "{:?}", result.error);
                    });
                },
            );
        }
    }

    group.finish();
}

fn naming_benchmark(c: &mut Criterion) {
    let fixture = Fixture::generate(2_000, 1).expect("fixture");

    c.bench_function("plan_entries/2000", |b| {
        b.iter(|| chronarc_lib::plan_entries(fixture.entries().to_vec()));
    });
}

criterion_group!(benches, pack_benchmark, naming_benchmark);
criterion_main!(benches);
