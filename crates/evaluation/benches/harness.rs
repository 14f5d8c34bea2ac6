//! Benchmarks for a full evaluation run
//!
//! Run with: cargo bench --package evaluation

use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{Interaction, Snapshot, Stall};
use evaluation::{EvaluationConfig, EvaluationDriver};
use scorers::GraphConvolution;

const STALLS: usize = 3000;
const USERS: usize = 500;
const DIM: usize = 32;

fn synthetic_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::new();
    for i in 0..STALLS {
        let stall_id = format!("stall-{:05}", i);
        snapshot.insert_stall(Stall {
            stall_id: stall_id.clone(),
            name: format!("Stall {}", i),
            address: String::new(),
            centre_id: None,
            rating: Some(4.0),
            business_status: None,
            name_norm: format!("stall {}", i),
            address_norm: String::new(),
        });
    }
    for u in 0..USERS {
        for k in 0..16 {
            snapshot.insert_interaction(Interaction {
                user_id: format!("user-{:04}", u),
                stall_id: format!("stall-{:05}", (u * 53 + k * 211) % STALLS),
                rating: if k % 5 == 0 { 3.0 } else { 5.0 },
                timestamp: (k * 86_400) as i64,
            });
        }
    }
    snapshot
}

/// Deterministic pseudo-embeddings, no model file needed
fn synthetic_model() -> GraphConvolution {
    let vector = |seed: usize| -> Vec<f32> {
        (0..DIM)
            .map(|d| (((seed * 31 + d * 17) % 97) as f32 / 97.0) - 0.5)
            .collect()
    };
    let users: HashMap<String, Vec<f32>> = (0..USERS)
        .map(|u| (format!("user-{:04}", u), vector(u)))
        .collect();
    let items: HashMap<String, Vec<f32>> = (0..STALLS)
        .map(|i| (format!("stall-{:05}", i), vector(i + USERS)))
        .collect();
    GraphConvolution::new(users, items)
}

fn bench_prepare(c: &mut Criterion) {
    let snapshot = synthetic_snapshot();
    let driver = EvaluationDriver::new(EvaluationConfig::default());

    c.bench_function("prepare_filter_and_split", |b| {
        b.iter(|| black_box(driver.prepare(black_box(&snapshot))))
    });
}

fn bench_run(c: &mut Criterion) {
    let snapshot = synthetic_snapshot();
    let model = synthetic_model();
    let driver = EvaluationDriver::new(EvaluationConfig::default());
    let prepared = driver
        .prepare(&snapshot)
        .expect("synthetic snapshot prepares");

    let mut group = c.benchmark_group("run_prepared");
    group.sample_size(10);
    group.bench_function("default_pools", |b| {
        b.iter(|| black_box(driver.run_prepared(&snapshot, &prepared, &model)))
    });
    group.finish();
}

criterion_group!(benches, bench_prepare, bench_run);
criterion_main!(benches);
