use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minefield_core::{Board, Difficulty, GameSession};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use web_time::Instant;

fn initialize_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize");
    for difficulty in Difficulty::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty.label()),
            &difficulty,
            |b, &difficulty| {
                let mut board = Board::new(difficulty);
                let mut rng = SmallRng::seed_from_u64(0);
                b.iter(|| {
                    board.initialize(&mut rng);
                    black_box(board.cells().len())
                });
            },
        );
    }
    group.finish();
}

fn safe_start_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("safe_start");
    for difficulty in Difficulty::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty.label()),
            &difficulty,
            |b, &difficulty| {
                let mut seed = 0;
                b.iter(|| {
                    seed += 1;
                    let mut session = GameSession::new(difficulty, seed);
                    black_box(session.reveal(0, Instant::now()))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, initialize_tiers, safe_start_tiers);
criterion_main!(benches);
