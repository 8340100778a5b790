//! Estimator benchmarks with 95% confidence intervals.
//!
//! Covers the three hot paths: one-shot estimation, the single-pass
//! running series, and repeated trials on the work-stealing pool.
//!
//! Run with: cargo criterion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mcquad::convergence::ConvergenceTracker;
use mcquad::engine::rng::McRng;
use mcquad::estimator::Integrator;
use mcquad::trials::TrialRunner;
use std::f64::consts::PI;

fn g(x: f64) -> f64 {
    x.sin() + x.cos()
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(100);
    group.confidence_level(0.95);

    for m in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("one_shot", m), &m, |b, &m| {
            let integrator = Integrator::new(m).with_bounds(0.0, PI);
            let mut rng = McRng::new(2023);
            b.iter(|| {
                let result = integrator.estimate(g, &mut rng).unwrap();
                black_box(result.estimate)
            });
        });
    }

    group.finish();
}

fn bench_running_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("running_series");
    group.sample_size(100);
    group.confidence_level(0.95);

    for m in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("single_pass", m), &m, |b, &m| {
            let integrator = Integrator::new(m).with_bounds(0.0, PI);
            let tracker = ConvergenceTracker::for_bounds(0.0, PI);
            let mut rng = McRng::new(2023);
            let evaluations = integrator.evaluate(g, &mut rng).unwrap();
            b.iter(|| {
                let series = tracker.running_series(&evaluations).unwrap();
                black_box(series.len())
            });
        });
    }

    group.finish();
}

fn bench_repeated_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("repeated_trials");
    group.sample_size(30);
    group.confidence_level(0.95);

    let runner = TrialRunner::new(100, Integrator::new(1_000).with_bounds(0.0, PI));

    group.bench_function("sequential", |b| {
        let mut rng = McRng::new(2023);
        b.iter(|| {
            let results = runner.run(g, &mut rng).unwrap();
            black_box(results.mean())
        });
    });

    for workers in [2, 4] {
        group.bench_with_input(
            BenchmarkId::new("work_stealing", workers),
            &workers,
            |b, &workers| {
                let mut rng = McRng::new(2023);
                b.iter(|| {
                    let results = runner.run_parallel(&g, &mut rng, workers).unwrap();
                    black_box(results.mean())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_estimate,
    bench_running_series,
    bench_repeated_trials
);
criterion_main!(benches);
