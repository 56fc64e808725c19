//! Criterion benchmarks for the annealing engine and its moves.
//!
//! Uses the 100-job reference instance and a synthetic uniform one to
//! measure per-iteration overhead.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_makespan::neighborhood::{exchange, relocate};
use u_makespan::{AnnealConfig, AnnealingEngine, Assignment, CoolingConfig, JobCatalog, RandomSource};

fn synthetic(jobs: usize) -> Arc<JobCatalog> {
    let durations = (0..jobs as u64).map(|i| 1 + (i * 7919) % 1000).collect();
    Arc::new(JobCatalog::new(durations).expect("synthetic catalog fits in u64"))
}

fn bench_engine_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_reference");
    group.sample_size(10);

    let catalog = Arc::new(JobCatalog::reference());
    for &machines in &[2usize, 10, 25] {
        let config = AnnealConfig::new(machines)
            .with_cooling(
                CoolingConfig::default()
                    .with_start_temperature(1e9)
                    .with_alpha(0.9999)
                    .with_max_iterations(10_000),
            )
            .with_seed(1843397);
        group.bench_with_input(
            BenchmarkId::from_parameter(machines),
            &(catalog.clone(), config),
            |b, (cat, cfg)| {
                b.iter(|| {
                    let engine = AnnealingEngine::new(cat.clone(), cfg.clone()).unwrap();
                    black_box(engine.run())
                })
            },
        );
    }
    group.finish();
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("moves");

    for &jobs in &[100usize, 1_000] {
        let catalog = synthetic(jobs);
        let mut rng = RandomSource::seeded(42);
        let start = Assignment::random(catalog, 10, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("relocate", jobs), &start, |b, s| {
            let mut a = s.clone();
            let mut rng = RandomSource::seeded(1);
            b.iter(|| black_box(relocate(&mut a, &mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("exchange", jobs), &start, |b, s| {
            let mut a = s.clone();
            let mut rng = RandomSource::seeded(2);
            b.iter(|| black_box(exchange(&mut a, &mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("restore", jobs), &start, |b, s| {
            let mut a = s.clone();
            b.iter(|| {
                a.restore_from(black_box(s));
                black_box(a.fitness())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine_reference, bench_moves);
criterion_main!(benches);
