use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3::core::{
    apply_gravity, expand, find_matches, Board, CellMask, CellSet, GameState, LevelConfig,
    SimpleRng,
};
use match3::types::{BombSize, Cell, Piece};

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(LevelConfig::default(), seed).unwrap();
    state.start();
    state
}

fn bench_find_matches(c: &mut Criterion) {
    let state = started(12345);

    c.bench_function("find_matches_6x6", |b| {
        b.iter(|| find_matches(black_box(state.board())))
    });
}

fn bench_gravity(c: &mut Criterion) {
    let state = started(12345);
    let mask = CellMask::full(6, 6);

    c.bench_function("gravity_half_cleared", |b| {
        b.iter(|| {
            let mut board = state.board().clone();
            // Clear every other row
            for y in (0..6).step_by(2) {
                for x in 0..6 {
                    board.set(x, y, None);
                }
            }
            apply_gravity(&mut board, &mask)
        })
    });
}

fn bench_expand_chain(c: &mut Criterion) {
    let mut board = Board::new(9, 9);
    for cell in board.positions().collect::<Vec<_>>() {
        board.put(cell, Some(Piece::plain(((cell.x + cell.y) % 4) as u8)));
    }
    for x in (0..9).step_by(2) {
        board.set(x, 4, Some(Piece::bomb(0, BombSize::Five)));
    }
    let mut seeds = CellSet::new(9, 9);
    seeds.insert(Cell::new(0, 4));

    c.bench_function("expand_bomb_chain", |b| {
        b.iter(|| expand(black_box(&board), black_box(&seeds)))
    });
}

fn bench_resolve_swap(c: &mut Criterion) {
    let rows = [
        "2 3 0 1 2 3",
        "0 1 2 3 0 1",
        "2 3 0 1 2 3",
        "3 2 1 0 3 2",
        "1 0 3 2 1 0",
        "0 1 0 0 2 3",
    ];
    let config = LevelConfig {
        color_count: 4,
        ..Default::default()
    };
    let board = Board::parse(&rows).unwrap();

    c.bench_function("resolve_bomb_swap", |b| {
        b.iter(|| {
            let mut state =
                GameState::with_board(config.clone(), board.clone(), SimpleRng::new(7)).unwrap();
            state
                .request_swap(Cell::new(1, 0), Cell::new(1, 1))
                .unwrap();
            state.resolve()
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_gravity,
    bench_expand_chain,
    bench_resolve_swap
);
criterion_main!(benches);
