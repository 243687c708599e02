//! Benchmarks for sweep-based crossing detection vs the exhaustive oracle.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use figura::{Entity, LineSet, Segment2};

/// Generates a deterministic pseudo-random segment soup.
fn generate_segments(count: usize, seed: u64) -> LineSet<f64> {
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state as f64 / u64::MAX as f64
    };

    let mut chain = LineSet::new();
    for _ in 0..count {
        let x = next() * 100.0;
        let y = next() * 100.0;
        let dx = next() * 4.0 - 2.0;
        let dy = next() * 4.0 - 2.0;
        chain.add(Entity::Segment(Segment2::from_coords(x, y, x + dx, y + dy)));
    }
    chain
}

/// O(n^2) reference: every pair gets the exact crossing test.
fn exhaustive_count(chain: &LineSet<f64>, eps: f64) -> usize {
    let mut count = 0;
    for i in 0..chain.len() {
        for j in (i + 1)..chain.len() {
            count += chain.get(i).crossings(chain.get(j), eps).len();
        }
    }
    count
}

fn bench_intersections_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersections_within");

    for size in [100, 400, 1600] {
        let chain = generate_segments(size, 0x5eed);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sweep", size), &chain, |b, chain| {
            b.iter(|| black_box(chain.intersections_within(1e-9)).len());
        });

        group.bench_with_input(BenchmarkId::new("exhaustive", size), &chain, |b, chain| {
            b.iter(|| black_box(exhaustive_count(chain, 1e-9)));
        });
    }

    group.finish();
}

fn bench_intersections_between(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersections_between");

    for size in [100, 400, 1600] {
        let a = generate_segments(size, 0x5eed);
        let b_set = generate_segments(size, 0xf00d);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(a, b_set),
            |bench, (a, b_set)| {
                bench.iter(|| black_box(a.intersections_between(b_set, None, None, 1e-9)).len());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_intersections_within, bench_intersections_between);
criterion_main!(benches);
