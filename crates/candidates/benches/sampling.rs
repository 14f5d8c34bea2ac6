//! Benchmarks for splitting and candidate sampling
//!
//! Run with: cargo bench --package candidates
//!
//! Uses a synthetic catalog about the size of Singapore's hawker stalls.

use candidates::{NegativePool, SplitStrategy, split_interactions, user_rng};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{Interaction, StallId};

const STALLS: usize = 6000;
const USERS: usize = 2000;

fn synthetic_universe() -> Vec<StallId> {
    (0..STALLS).map(|i| format!("stall-{:05}", i)).collect()
}

fn synthetic_interactions() -> Vec<Interaction> {
    (0..USERS)
        .flat_map(|u| {
            (0..20).map(move |k| Interaction {
                user_id: format!("user-{:05}", u),
                stall_id: format!("stall-{:05}", (u * 37 + k * 101) % STALLS),
                rating: 5.0,
                timestamp: (k * 86_400) as i64,
            })
        })
        .collect()
}

fn bench_split(c: &mut Criterion) {
    let interactions = synthetic_interactions();

    c.bench_function("split_interactions_chronological", |b| {
        b.iter(|| {
            let split = split_interactions(
                black_box(interactions.clone()),
                SplitStrategy::Chronological,
                &mut user_rng(42, 0),
            );
            black_box(split)
        })
    });
}

fn bench_draw(c: &mut Criterion) {
    let universe = synthetic_universe();
    let split = split_interactions(synthetic_interactions(), SplitStrategy::Chronological, &mut user_rng(42, 0));
    let user = split.iter().next().expect("synthetic split has users");
    let test_items = user.test_items();

    c.bench_function("negative_pool_build", |b| {
        b.iter(|| {
            let pool = NegativePool::new(black_box(&universe), &user.train_items(), &test_items);
            black_box(pool)
        })
    });

    let pool = NegativePool::new(&universe, &user.train_items(), &test_items);
    c.bench_function("negative_pool_draw_2000", |b| {
        let mut rng = user_rng(42, 1);
        b.iter(|| {
            let candidates = pool.draw(black_box(2000), &test_items, &mut rng);
            black_box(candidates)
        })
    });
}

criterion_group!(benches, bench_split, bench_draw);
criterion_main!(benches);
