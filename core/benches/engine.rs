use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use minelab_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, rows, cols, mines) in [
        ("beginner", 9, 9, 10),
        ("intermediate", 16, 16, 40),
        ("expert", 16, 30, 99),
    ] {
        let config = GameConfig::new(rows, cols, mines).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        group.bench_function(name, |b| {
            b.iter(|| Board::generate(black_box(config), &mut rng).unwrap())
        });
    }
    group.finish();
}

fn cascade(c: &mut Criterion) {
    let board = Board::from_mine_coords(256, 256, &[(255, 255)]).unwrap();
    c.bench_function("cascade 256x256", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| board.reveal(black_box((0, 0))).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn state_matrix(c: &mut Criterion) {
    let mut board = Board::generate(
        GameConfig::new(16, 30, 99).unwrap(),
        &mut SmallRng::seed_from_u64(1),
    )
    .unwrap();
    for col in 0..30 {
        let _ = board.reveal((8, col));
    }
    c.bench_function("state matrix expert", |b| b.iter(|| black_box(&board).state_matrix()));
}

criterion_group!(benches, generation, cascade, state_matrix);
criterion_main!(benches);
