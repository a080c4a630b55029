//! Benchmarks for the sliding-block puzzle solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::channel;

use klotski::grid::{canonical_key, format_board, map_cells};
use klotski::moves::legal_moves;
use klotski::{Puzzle, Reporter, Trial};

/// Benchmark one complete depth-bounded trial on the reference layout.
fn bench_trial(c: &mut Criterion) {
    let puzzle = Puzzle::klotski();
    let target = puzzle.target().expect("reference layout has a target").id;
    let (tx, _rx) = channel();
    let mut reporter = Reporter::new(tx);

    let mut group = c.benchmark_group("trial");
    group.sample_size(10);
    group.bench_function("klotski_depth_200", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut trial = Trial::new(
                puzzle.board,
                puzzle.goal,
                target,
                200,
                1,
                &mut rng,
                &mut reporter,
            );
            black_box(trial.run(&puzzle.pieces))
        })
    });
    group.finish();
}

/// Benchmark enumerating the legal moves of the start position.
fn bench_legal_moves(c: &mut Criterion) {
    let puzzle = Puzzle::klotski();
    let grid = map_cells(puzzle.board, &puzzle.pieces);

    c.bench_function("legal_moves", |b| {
        b.iter(|| legal_moves(puzzle.board, black_box(&puzzle.pieces), &grid, None))
    });
}

/// Benchmark computing the canonical state key.
fn bench_canonical_key(c: &mut Criterion) {
    let puzzle = Puzzle::klotski();

    c.bench_function("canonical_key", |b| {
        b.iter(|| canonical_key(black_box(&puzzle.pieces)))
    });
}

/// Benchmark building the occupancy grid.
fn bench_map_cells(c: &mut Criterion) {
    let puzzle = Puzzle::klotski();

    c.bench_function("map_cells", |b| {
        b.iter(|| map_cells(puzzle.board, black_box(&puzzle.pieces)))
    });
}

/// Benchmark formatting the board for display.
fn bench_format_board(c: &mut Criterion) {
    let puzzle = Puzzle::klotski();

    c.bench_function("format_board", |b| {
        b.iter(|| format_board(puzzle.board, black_box(&puzzle.pieces)))
    });
}

criterion_group!(
    benches,
    bench_trial,
    bench_legal_moves,
    bench_canonical_key,
    bench_map_cells,
    bench_format_board
);
criterion_main!(benches);
