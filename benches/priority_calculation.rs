//! Priority and completeness benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use uuid::Uuid;

use rapport::adapters::sqlite::{
    create_migrated_test_pool, SqliteEvidenceRepository, SqliteProfileRepository, SqliteSignalRepository,
};
use rapport::domain::models::{Axis, SignalObservation};
use rapport::services::{CompletenessEngine, PriorityCalculator, SignalStore};
use std::sync::Arc;

fn completeness_map(step: usize) -> HashMap<Axis, f64> {
    Axis::ALL
        .iter()
        .enumerate()
        .map(|(i, &axis)| (axis, ((i + step) % 5) as f64 * 0.25))
        .collect()
}

fn bench_priorities(c: &mut Criterion) {
    let calculator = PriorityCalculator::new();
    let map = completeness_map(3);

    c.bench_function("calculate_all_priorities", |b| {
        b.iter(|| calculator.calculate_all(black_box(&map)))
    });

    c.bench_function("highest_priority_axis", |b| {
        let priorities = calculator.calculate_all(&map);
        b.iter(|| calculator.highest(black_box(&priorities)))
    });

    c.bench_function("baseline_met", |b| b.iter(|| calculator.baseline_met(black_box(&map))));
}

fn bench_completeness(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let engine = runtime.block_on(async {
        let pool = create_migrated_test_pool().await.expect("pool");
        let signal_repo = Arc::new(SqliteSignalRepository::new(pool.clone()));
        let profile_repo = Arc::new(SqliteProfileRepository::new(pool.clone()));
        let store = SignalStore::new(
            signal_repo.clone(),
            Arc::new(SqliteEvidenceRepository::new(pool)),
            profile_repo.clone(),
        );
        for dimension in ["risk_tolerance", "moral.care", "moral.fairness", "big_five.openness", "life_situation.work_status"] {
            store
                .upsert(SignalObservation::new(dimension, "observed").grounded("benchmark quote", Uuid::new_v4()))
                .await
                .expect("upsert");
        }
        CompletenessEngine::new(signal_repo, profile_repo)
    });

    c.bench_function("all_axis_completeness", |b| {
        b.to_async(&runtime).iter(|| async { engine.all_axis_completeness().await.expect("completeness") })
    });
}

criterion_group!(benches, bench_priorities, bench_completeness);
criterion_main!(benches);
