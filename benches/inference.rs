//! Benchmarks for the stress inference pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stresswatch::StressEngine;

fn infer_benchmark(c: &mut Criterion) {
    let engine = StressEngine::new();

    let mut group = c.benchmark_group("infer");

    group.bench_function("single_rule_region", |b| {
        // Inputs deep inside one term per variable: one rule fires.
        b.iter(|| black_box(engine.infer(black_box(1.0), 24.0, 50.0, 0.5)))
    });

    group.bench_function("overlap_region", |b| {
        // Inputs in the overlap bands: several rules fire per variable pair.
        b.iter(|| black_box(engine.infer(black_box(3.5), 21.0, 30.0, 1.8)))
    });

    group.finish();
}

fn resolution_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("defuzzification_resolution");

    for resolution in [101usize, 501, 1001] {
        let engine = StressEngine::new().with_resolution(resolution);
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &engine,
            |b, engine| b.iter(|| black_box(engine.infer(black_box(6.0), 27.0, 70.0, 2.2))),
        );
    }

    group.finish();
}

criterion_group!(benches, infer_benchmark, resolution_benchmark);
criterion_main!(benches);
